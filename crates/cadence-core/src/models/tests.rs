#[cfg(test)]
mod model_tests {
    use std::collections::BTreeMap;

    use jiff::{Timestamp, civil::date};

    use crate::{
        catalog::Catalog,
        display::{Countdown, DaysAgo, HistoryReport, SessionSummary},
        models::{
            PlanningCategory, PlanningStepView, SelectionCommitment, SessionRecord, StepChoice,
            StepDefinition, StepStats,
        },
        walkthrough::{StepTimer, TimerState},
    };

    fn create_test_step() -> StepDefinition {
        StepDefinition {
            id: 5,
            title: "Bond repair mask".to_string(),
            description: "Rebuild broken bonds.".to_string(),
            is_optional: true,
            actions: vec!["Apply to damp hair".to_string(), "Rinse".to_string()],
            products: vec!["Mask A".to_string(), "Mask B".to_string()],
            preferred_product: Some("Mask B".to_string()),
            timer_duration_seconds: Some(300),
            notes: Some("Once a week".to_string()),
        }
    }

    fn completed_at() -> Timestamp {
        Timestamp::from_second(1_710_000_000).unwrap()
    }

    #[test]
    fn test_step_helpers() {
        let mut step = create_test_step();
        assert!(!step.is_required());
        assert!(step.has_timer());
        assert_eq!(step.featured_product(), Some("Mask B"));

        step.preferred_product = None;
        assert_eq!(step.featured_product(), Some("Mask A"));

        step.products.clear();
        assert_eq!(step.featured_product(), None);
    }

    #[test]
    fn test_step_defaults_from_json() {
        let step: StepDefinition =
            serde_json::from_str(r#"{"id": 3, "title": "Scalp cleanse"}"#).unwrap();
        assert!(step.is_required());
        assert!(step.actions.is_empty());
        assert_eq!(step.timer_duration_seconds, None);
        assert_eq!(step.description, "");
    }

    #[test]
    fn test_step_display() {
        let output = create_test_step().to_string();
        assert!(output.starts_with("### 5. Bond repair mask (optional)"));
        assert!(output.contains("1. Apply to damp hair"));
        assert!(output.contains("2. Rinse"));
        assert!(output.contains("- **Mask B** (preferred)"));
        assert!(output.contains("- Mask A\n"));
        assert!(output.contains("- **Timer**: 5:00"));
        assert!(output.contains("- **Notes**: Once a week"));
    }

    #[test]
    fn test_category_parsing_and_order() {
        assert_eq!(
            "Recommended".parse::<PlanningCategory>(),
            Ok(PlanningCategory::Recommended)
        );
        assert!("later".parse::<PlanningCategory>().is_err());
        assert!(PlanningCategory::Required < PlanningCategory::Recommended);
        assert!(PlanningCategory::Recommended < PlanningCategory::Optional);
        assert_eq!(PlanningCategory::Optional.to_string(), "optional");
        assert_eq!(PlanningCategory::Required.label(), "Required Steps");
        assert!(PlanningCategory::Recommended.is_preselected());
        assert!(!PlanningCategory::Optional.is_preselected());
        assert_eq!(
            serde_json::to_string(&PlanningCategory::Recommended).unwrap(),
            "\"recommended\""
        );
    }

    #[test]
    fn test_planning_view_serializes_flat() {
        let view = PlanningStepView {
            step: create_test_step(),
            category: PlanningCategory::Recommended,
            days_since_performed: Some(1.5),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["category"], "recommended");
        assert_eq!(value["days_since_performed"], 1.5);
        assert!(view.to_string().contains("5. Bond repair mask ⏱"));
    }

    #[test]
    fn test_session_from_choices() {
        let mut choices = BTreeMap::new();
        choices.insert(7, false);
        choices.insert(2, true);

        let record = SessionRecord::from_choices(&choices, Some("sam".to_string()), completed_at());
        assert_eq!(
            record.choices,
            vec![
                StepChoice {
                    step_id: 2,
                    performed: true
                },
                StepChoice {
                    step_id: 7,
                    performed: false
                },
            ]
        );
        assert!(record.performed(2));
        assert!(!record.performed(7));
        assert!(!record.performed(1));
        assert!(record.choice_for(1).is_none());

        let other = SessionRecord::from_choices(&choices, None, completed_at());
        assert_ne!(record.session_id, other.session_id);
    }

    #[test]
    fn test_session_ownership() {
        let record = SessionRecord::from_choices(&BTreeMap::new(), Some("sam".to_string()), completed_at());
        assert!(record.is_owned_by(None));
        assert!(record.is_owned_by(Some("sam")));
        assert!(!record.is_owned_by(Some("alex")));

        let anonymous = SessionRecord::from_choices(&BTreeMap::new(), None, completed_at());
        assert!(anonymous.is_owned_by(None));
        assert!(!anonymous.is_owned_by(Some("sam")));
    }

    #[test]
    fn test_session_without_choices_parses() {
        let record: SessionRecord = serde_json::from_str(
            r#"{"session_id": "abc", "completed_at": "2024-03-10T08:00:00Z"}"#,
        )
        .unwrap();
        assert!(record.choices.is_empty());
        assert_eq!(record.owner_id, None);
    }

    #[test]
    fn test_selection_commitment_orders_ids() {
        let commitment = SelectionCommitment::new(None, date(2024, 3, 10), [6, 1, 3, 1]);
        assert_eq!(commitment.ordered_step_ids(), &[1, 3, 6]);
        assert!(!commitment.is_empty());

        let value = serde_json::to_value(&commitment).unwrap();
        assert_eq!(value["committed_date"], "2024-03-10");
        assert!(value.get("owner_id").is_none());
    }

    #[test]
    fn test_countdown_and_recency_display() {
        assert_eq!(Countdown(0).to_string(), "0:00");
        assert_eq!(Countdown(600).to_string(), "10:00");
        assert_eq!(DaysAgo(None).to_string(), "never performed");
        assert_eq!(DaysAgo(Some(0.0)).to_string(), "performed today");
        assert_eq!(DaysAgo(Some(0.6)).to_string(), "performed 1 day ago");
        assert_eq!(DaysAgo(Some(2.4)).to_string(), "performed 2 days ago");
    }

    #[test]
    fn test_timer_display() {
        assert_eq!(TimerState::Running(65).to_string(), "1:05 remaining");
        assert_eq!(TimerState::Expired.to_string(), "done");

        let mut timer = StepTimer::new(4);
        timer.start();
        timer.tick();
        let output = timer.to_string();
        assert!(output.contains("0:03 of 0:04"));
        assert!(output.contains("#####-"));
    }

    #[test]
    fn test_history_report_display() {
        let empty = HistoryReport(vec![StepStats {
            step_id: 1,
            title: "Detangle".to_string(),
            performed_count: 0,
            total_sessions: 0,
            percentage: 0,
        }]);
        assert!(empty.to_string().contains("No sessions recorded yet."));

        let report = HistoryReport(vec![StepStats {
            step_id: 1,
            title: "Detangle".to_string(),
            performed_count: 2,
            total_sessions: 3,
            percentage: 67,
        }]);
        let output = report.to_string();
        assert!(output.contains("3 sessions recorded."));
        assert!(output.contains("| 1 | Detangle | 2/3 | 67% |"));
    }

    #[test]
    fn test_session_summary_display() {
        let catalog = Catalog::new(vec![create_test_step()]).unwrap();
        let mut choices = BTreeMap::new();
        choices.insert(5, true);
        choices.insert(9, false);
        let record = SessionRecord::from_choices(&choices, None, completed_at());

        let output = SessionSummary::new(&record, &catalog).to_string();
        assert!(output.contains("1/2 steps performed"));
        assert!(output.contains("- [x] 5. Bond repair mask"));
        assert!(output.contains("- [ ] 9. (unknown step)"));
    }
}
