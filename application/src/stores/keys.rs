//! Key layout in the key-value store. One prefix per record type.

pub const AGENT_CONFIG: &str = "agent_config:";
pub const SESSION: &str = "session:";
pub const TRANSCRIPT: &str = "transcript:";
pub const DELIVERABLE: &str = "deliverable:";
pub const TASK: &str = "task:";
pub const ROSTER: &str = "team:";

pub const AUTOPILOT: &str = "settings:autopilot";
pub const NOTIFICATIONS: &str = "settings:notifications";
pub const LATEST_ANALYSIS: &str = "analysis:latest";

pub fn agent_config(agent_id: &str) -> String {
    format!("{AGENT_CONFIG}{agent_id}")
}

pub fn session(id: &str) -> String {
    format!("{SESSION}{id}")
}

pub fn transcript_prefix(session_id: &str) -> String {
    format!("{TRANSCRIPT}{session_id}:")
}

/// Zero-padded so that key order is index order
pub fn transcript(session_id: &str, index: usize) -> String {
    format!("{}{index:05}", transcript_prefix(session_id))
}

pub fn deliverable(id: &str) -> String {
    format!("{DELIVERABLE}{id}")
}

pub fn task(id: &str) -> String {
    format!("{TASK}{id}")
}

/// Zero-padded position so the roster scans back in display order
pub fn roster_member(position: usize, persona_id: &str) -> String {
    format!("{ROSTER}{position:03}:{persona_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_keys_sort_by_index() {
        let a = transcript("s1", 2);
        let b = transcript("s1", 10);
        assert!(a < b);
        assert!(a.starts_with(&transcript_prefix("s1")));
    }

    #[test]
    fn test_roster_keys_sort_by_position() {
        assert!(roster_member(2, "zed") < roster_member(10, "amy"));
    }
}
