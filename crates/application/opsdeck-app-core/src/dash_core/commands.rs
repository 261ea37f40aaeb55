use opsdeck_core::{GroupId, InstructionId};

#[derive(Debug, Clone)]
pub enum DashCommand {
    // Execution requests, fire-and-forget. Outcomes arrive later as
    // ordinary status pushes.
    ApplyGroup(GroupId),
    ApplyInstruction(InstructionId),

    // Lazy fetches
    FetchUsers,
    FetchGlobalVariables,
    FetchOlderLogs,
}
