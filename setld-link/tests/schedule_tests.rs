use setld_link::{AnchorLayout, LinkOptions, Schedule, merge_sections, resolve, schedule};
use setld_model::{
    ActionFlags, Anchor, BindingPolicy, CustomAction, Platform, Row, Section,
    SequencingConstraint, Value, standard,
};
use setld_result::{Error, Report, Result};

fn payload(section: Section) -> Section {
    section.with_row(
        Row::new(standard::BINARY, "Payload", vec![Value::from("[x86]")]).with_arch(Platform::X86),
    )
}

fn action(id: &str, flags: ActionFlags) -> CustomAction {
    CustomAction::new(id, flags, "Payload", id, BindingPolicy::FixedX86)
}

fn schedule_sections(sections: &[Section], options: &LinkOptions) -> Result<Schedule> {
    let mut report = Report::new();
    let merged = merge_sections(sections, &mut report);
    let resolution = resolve(&merged, options, &mut report);
    assert!(report.is_empty(), "resolution failed: {report}");
    schedule(&resolution, options)
}

fn sequence_of(schedule: &Schedule, qualified: &str) -> u32 {
    schedule
        .forward
        .iter()
        .find(|p| p.action == qualified)
        .map(|p| p.sequence)
        .unwrap_or_else(|| panic!("no forward placement for {qualified}"))
}

#[test]
fn default_intervals_separate_immediate_and_deferred_work() {
    let section = payload(Section::new("ext.a"))
        .with_action(action("Dispatch", ActionFlags::empty()))
        .with_action(action("Exec", ActionFlags::DEFERRED).with_rollback("ExecRollback"))
        .with_action(action("ExecRollback", ActionFlags::ROLLBACK));

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();

    let dispatch = sequence_of(&schedule, "Dispatch_X86");
    let exec = sequence_of(&schedule, "Exec_X86");
    assert!(dispatch > 1000 && dispatch < 1500, "dispatch at {dispatch}");
    assert!(exec > 1500 && exec < 6600, "exec at {exec}");
}

#[test]
fn constraints_order_actions_within_an_interval() {
    let section = payload(Section::new("ext.a"))
        .with_action(
            action("Second", ActionFlags::empty())
                .with_constraint(SequencingConstraint::after_action("First")),
        )
        .with_action(action("First", ActionFlags::empty()));

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();

    assert!(sequence_of(&schedule, "First_X86") < sequence_of(&schedule, "Second_X86"));
}

#[test]
fn ties_break_by_canonical_module_order_not_supply_order() {
    let a = payload(Section::new("ext.a")).with_action(action("FromA", ActionFlags::empty()));
    let b = Section::new("ext.b").with_action(action("FromB", ActionFlags::empty()));

    let options = LinkOptions::new(Platform::X86);
    let forward = schedule_sections(&[a.clone(), b.clone()], &options).unwrap();
    let reversed = schedule_sections(&[b, a], &options).unwrap();

    assert_eq!(forward.forward, reversed.forward);
    assert!(sequence_of(&forward, "FromA_X86") < sequence_of(&forward, "FromB_X86"));
}

#[test]
fn anchor_constraints_move_actions_out_of_their_default_interval() {
    let section = payload(Section::new("ext.a"))
        .with_action(
            action("Early", ActionFlags::empty())
                .with_constraint(SequencingConstraint::before_anchor(Anchor::CostInitialize)),
        )
        .with_action(
            action("Late", ActionFlags::empty())
                .with_constraint(SequencingConstraint::after_anchor(Anchor::InstallFinalize)),
        );

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();

    assert!(sequence_of(&schedule, "Early_X86") < 800);
    assert!(sequence_of(&schedule, "Late_X86") > 6600);
}

#[test]
fn constraint_cycle_names_every_participant() {
    let section = payload(Section::new("ext.a"))
        .with_action(
            action("A", ActionFlags::empty())
                .with_constraint(SequencingConstraint::before_action("B")),
        )
        .with_action(
            action("B", ActionFlags::empty())
                .with_constraint(SequencingConstraint::before_action("C")),
        )
        .with_action(
            action("C", ActionFlags::empty())
                .with_constraint(SequencingConstraint::before_action("A")),
        );

    let options = LinkOptions::new(Platform::X86);
    let err = schedule_sections(&[section], &options).unwrap_err();
    match err {
        Error::ConflictingOrderingConstraint { cycle } => {
            for name in ["A", "B", "C"] {
                assert!(cycle.iter().any(|n| n == name), "{name} missing: {cycle:?}");
            }
        }
        other => panic!("expected cycle error, got {other}"),
    }
}

#[test]
fn removing_one_edge_breaks_the_cycle() {
    let section = payload(Section::new("ext.a"))
        .with_action(
            action("A", ActionFlags::empty())
                .with_constraint(SequencingConstraint::before_action("B")),
        )
        .with_action(
            action("B", ActionFlags::empty())
                .with_constraint(SequencingConstraint::before_action("C")),
        )
        .with_action(action("C", ActionFlags::empty()));

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();
    assert!(sequence_of(&schedule, "A_X86") < sequence_of(&schedule, "B_X86"));
    assert!(sequence_of(&schedule, "B_X86") < sequence_of(&schedule, "C_X86"));
}

#[test]
fn interval_with_no_room_overflows() {
    let tight = AnchorLayout::new(vec![
        (Anchor::CostInitialize, 800),
        (Anchor::CostFinalize, 1000),
        (Anchor::InstallInitialize, 1002),
        (Anchor::InstallFinalize, 6600),
    ])
    .unwrap();
    let options = LinkOptions::new(Platform::X86).with_anchors(tight);

    let section = payload(Section::new("ext.a"))
        .with_action(action("One", ActionFlags::empty()))
        .with_action(action("Two", ActionFlags::empty()));

    let err = schedule_sections(&[section], &options).unwrap_err();
    match err {
        Error::AnchorOverflow { upper, action, .. } => {
            assert_eq!(upper, "InstallInitialize");
            assert_eq!(action, "Two");
        }
        other => panic!("expected overflow, got {other}"),
    }
}

#[test]
fn rollback_order_is_the_reverse_of_forward_order() {
    let deferred = ActionFlags::DEFERRED;
    let rollback = ActionFlags::ROLLBACK;
    let section = payload(Section::new("ext.a"))
        .with_action(action("CreateShare", deferred).with_rollback("CreateShareRollback"))
        .with_action(action("CreateShareRollback", rollback))
        .with_action(
            action("DropShare", deferred)
                .with_constraint(SequencingConstraint::after_action("CreateShare"))
                .with_rollback("DropShareRollback"),
        )
        .with_action(action("DropShareRollback", rollback));

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();

    assert!(sequence_of(&schedule, "CreateShare_X86") < sequence_of(&schedule, "DropShare_X86"));

    let order: Vec<&str> = schedule.rollback.iter().map(|p| p.action.as_str()).collect();
    assert_eq!(order, ["DropShareRollback_X86", "CreateShareRollback_X86"]);
    let sequences: Vec<u32> = schedule.rollback.iter().map(|p| p.sequence).collect();
    assert_eq!(sequences, [1, 2]);
}

#[test]
fn unpaired_forward_actions_emit_no_rollback_placement() {
    let section =
        payload(Section::new("ext.a")).with_action(action("Dispatch", ActionFlags::empty()));

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();
    assert!(schedule.rollback.is_empty());
}

#[test]
fn conditions_ride_along_to_placements() {
    let section = payload(Section::new("ext.a")).with_action(
        action("Dispatch", ActionFlags::empty()).with_condition("NOT Installed"),
    );

    let options = LinkOptions::new(Platform::X86);
    let schedule = schedule_sections(&[section], &options).unwrap();
    assert_eq!(
        schedule.forward[0].condition.as_deref(),
        Some("NOT Installed")
    );
}
