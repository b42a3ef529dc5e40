use crate::models::Tracker;

pub const BADGE_COLOR: &str = "#ff9f0a";

/// Number of trackers still above their target, empty when there are none.
pub fn badge_text(trackers: &[Tracker]) -> String {
    let waiting = trackers.iter().filter(|t| t.above_target()).count();
    if waiting > 0 {
        waiting.to_string()
    } else {
        String::new()
    }
}
