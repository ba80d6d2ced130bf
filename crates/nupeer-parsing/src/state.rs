use crate::Semester;
use crate::line::LineKind;

/// Context carried from line to line during a scan.
///
/// Each parse owns its own state; nothing is shared between parses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserState {
    pub current_semester: Option<Semester>,
    pub current_year: Option<i32>,
    pub in_transfer_section: bool,
    pub transfer_term: Option<Semester>,
    pub transfer_year: Option<i32>,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Term that transfer rows are credited to, if a transfer block is open
    /// and its "Transferred to Term" marker has been seen.
    pub fn transfer_target(&self) -> Option<(&Semester, i32)> {
        if !self.in_transfer_section {
            return None;
        }
        match (&self.transfer_term, self.transfer_year) {
            (Some(term), Some(year)) => Some((term, year)),
            _ => None,
        }
    }

    /// Fold one classified line into the state.
    pub fn apply(&mut self, kind: &LineKind) {
        match kind {
            LineKind::TransferSection => {
                self.in_transfer_section = true;
            }
            LineKind::TransferredToTerm(Some((term, year))) => {
                self.transfer_term = Some(term.clone());
                self.transfer_year = Some(*year);
                self.in_transfer_section = true;
            }
            LineKind::TransferExit => {
                self.in_transfer_section = false;
            }
            LineKind::Header { semester, year } => {
                self.in_transfer_section = false;
                self.current_semester = Some(semester.clone());
                self.current_year = Some(*year);
            }
            LineKind::TransferredToTerm(None)
            | LineKind::TransferCourse(_)
            | LineKind::Noise
            | LineKind::Courses { .. }
            | LineKind::Unrecognized => {}
        }
    }
}
