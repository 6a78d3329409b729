/// OpenF1 `session_name` to the Ergast schedule field carrying that session.
pub fn map_session_name(external: &str) -> Option<&'static str> {
    match external {
        "Practice 1" => Some("FirstPractice"),
        "Practice 2" => Some("SecondPractice"),
        "Practice 3" => Some("ThirdPractice"),
        "Sprint Qualifying" | "Sprint Shootout" => Some("SprintQualifying"),
        "Sprint" => Some("Sprint"),
        "Qualifying" => Some("Qualifying"),
        "Race" => Some("Race"),
        _ => None,
    }
}

/// Ergast schedule field to the OpenF1 `session_name` and `session_type`.
pub fn unmap_session_name(schedule_field: &str) -> Option<(&'static str, &'static str)> {
    match schedule_field {
        "FirstPractice" => Some(("Practice 1", "Practice")),
        "SecondPractice" => Some(("Practice 2", "Practice")),
        "ThirdPractice" => Some(("Practice 3", "Practice")),
        "SprintQualifying" | "SprintShootout" => Some(("Sprint Qualifying", "Qualifying")),
        "Sprint" => Some(("Sprint", "Race")),
        "Qualifying" => Some(("Qualifying", "Qualifying")),
        "Race" => Some(("Race", "Race")),
        _ => None,
    }
}

/// Ergast statuses counted as classified finishes: "Finished" and lapped
/// runners ("+1 Lap", "+3 Laps").
pub fn is_classified_finish(status: &str) -> bool {
    status == "Finished" || status.starts_with('+')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_names_map_both_ways() {
        for name in ["Practice 1", "Practice 2", "Practice 3", "Qualifying", "Race", "Sprint"] {
            let field = map_session_name(name).unwrap();
            assert_eq!(unmap_session_name(field).unwrap().0, name);
        }
        assert_eq!(map_session_name("Day 1"), None);
    }

    #[test]
    fn lapped_cars_are_classified() {
        assert!(is_classified_finish("Finished"));
        assert!(is_classified_finish("+1 Lap"));
        assert!(!is_classified_finish("Engine"));
        assert!(!is_classified_finish("Retired"));
    }
}
