//! The Airtable column table.
//!
//! Maps the application table's column names to internal attribute keys.
//! Several columns carry aliases because the table has been renamed over
//! cohorts ("Email" vs "Email Address", "Video" vs "Video Link"). Adjust
//! these entries to match your base.

use sift_core::FieldMap;

/// `(Airtable column, internal key)` pairs for the applications table.
pub const COLUMN_TABLE: &[(&str, &str)] = &[
    // Core identity and contact columns.
    ("Email", "email"),
    ("Email Address", "email"),
    ("First", "first_name"),
    ("Last", "last_name"),
    ("First Name", "first_name"),
    ("Last Name", "last_name"),
    ("Name", "name"),
    ("Project name", "company"),
    ("Phone", "phone"),
    ("Birthday", "birthday"),
    ("Born", "birthday"),
    ("Location", "location"),
    ("Technical?", "technical"),
    ("Previously applied?", "previously_applied"),
    // Pipeline columns.
    ("Stage", "stage"),
    ("Accept or Reject or Waitlist", "decision"),
    ("Flag", "flag"),
    ("Flagged", "flag"),
    ("Notes", "notes"),
    ("AI Score", "score"),
    ("Score", "score"),
    // Stage-related scheduling columns.
    ("Stage 2 Link To Calendar", "stage2_calendar"),
    ("Stage 3 Schedule and Date", "stage3_schedule"),
    ("Stage 4 Onboarding Doc", "stage4_onboarding"),
    ("Upcoming Cohort Date", "upcoming_cohort_date"),
    ("Waitlist Update", "waitlist_update"),
    // Interview scorecard columns.
    ("Cory Interview: Energy", "cory_energy"),
    ("Cory Interview: Overall score?", "cory_overall_score"),
    ("Cory Interview: Smart?", "cory_smart"),
    ("Cory Interview: Storytelling?", "cory_storytelling"),
    ("Cory notes", "cory_notes"),
    // Application content columns.
    ("School or Work", "school_or_work"),
    (
        "What is the project that you are currently working on or would like to pursue? Why?",
        "project_description",
    ),
    ("What problem are you solving?", "problem_solving"),
    (
        "What expertise do you have to execute on the work that you want to do?",
        "expertise",
    ),
    (
        "Who are your competitors and what do you understand about your idea that they don't?",
        "competitors",
    ),
    ("What have you worked on in the past?", "past_work"),
    ("What's the nerdiest thing about you?", "nerdy"),
    ("What drives you?", "drives"),
    (
        "What non-traditional things were you doing growing up?",
        "non_traditional",
    ),
    (
        "Tell us about a risk you've taken or a challenge you've faced. Tell us whether you failed or succeeded, how you behaved, and how you think this reflects your character.",
        "risk_or_challenge",
    ),
    (
        "Please list or describe any achievements and prizes.",
        "achievements",
    ),
    // Links and misc.
    ("Website", "website"),
    ("Video Link", "video_link"),
    ("Video", "video_link"),
    ("Pitch Video", "pitch_video"),
    ("Pitch video", "pitch_video"),
    ("Cofounder", "cofounder"),
    ("Dream Cofounder", "cofounder"),
    ("How did you hear about us?", "how_heard"),
    ("How did you hear about Z Fellows?", "how_heard"),
    ("What help do you need?", "help_needed"),
    ("Help Needed", "help_needed"),
];

/// Column written when a stage change syncs back.
pub const STAGE_COLUMN: &str = "Stage";
/// Column written when the spotlight flag moves.
pub const FLAG_COLUMN: &str = "Flag";
/// Column written when reviewer notes save.
pub const NOTES_COLUMN: &str = "Notes";

/// The standard field map for the applications table.
#[must_use]
pub fn standard_field_map() -> FieldMap {
    FieldMap::from_entries(COLUMN_TABLE.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_the_same_key() {
        let map = standard_field_map();
        assert_eq!(map.lookup("Email"), Some("email"));
        assert_eq!(map.lookup("Email Address"), Some("email"));
        assert_eq!(map.lookup("Video"), Some("video_link"));
        assert_eq!(map.lookup("Video Link"), Some("video_link"));
    }

    #[test]
    fn write_columns_are_mapped_for_reads_too() {
        let map = standard_field_map();
        assert_eq!(map.lookup(STAGE_COLUMN), Some("stage"));
        assert_eq!(map.lookup(FLAG_COLUMN), Some("flag"));
        assert_eq!(map.lookup(NOTES_COLUMN), Some("notes"));
    }

    #[test]
    fn unmapped_columns_stay_unmapped() {
        let map = standard_field_map();
        assert_eq!(map.lookup("Some Internal Column"), None);
    }
}
