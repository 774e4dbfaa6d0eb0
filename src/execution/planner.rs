use crate::models::{Action, FileProfile, Proposal, Suggestion};

/// Maps a suggestion and the mode flags onto a concrete action
pub struct ActionPlanner;

impl ActionPlanner {
    /// | move | rename | action                              |
    /// |------|--------|-------------------------------------|
    /// | no   | no     | Skip, carrying what would happen    |
    /// | yes  | no     | Move, original name kept            |
    /// | no   | yes    | Rename, original folder kept        |
    /// | yes  | yes    | MoveAndRename                       |
    ///
    /// Without a suggestion the result is always a bare Skip.
    pub fn plan(
        profile: &FileProfile,
        suggestion: Option<&Suggestion>,
        move_enabled: bool,
        rename_enabled: bool,
    ) -> Action {
        let Some(suggestion) = suggestion else {
            tracing::trace!(file = %profile.name, "No suggestion, skipping");
            return Action::Skip { proposal: None };
        };

        let new_folder = suggestion.relative_folder();
        let new_name = suggestion.file_name.clone();

        match (move_enabled, rename_enabled) {
            (false, false) => Action::Skip {
                proposal: Some(Proposal {
                    new_folder,
                    new_name,
                }),
            },
            (true, false) => Action::Move { new_folder },
            (false, true) => Action::Rename { new_name },
            (true, true) => Action::MoveAndRename {
                new_folder,
                new_name,
            },
        }
    }
}
