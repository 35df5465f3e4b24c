//! Integration tests for end-to-end permission resolution.

use autops_core::entity::Identified;
use autops_core::identifier::Identifier;
use autops_core::identity::{Restricted, User};
use autops_core::policy::{
    Effect, Policy, PolicyAction, ProjectAction, Statement, WorkflowAction,
};
use autops_core::project::Project;

fn read() -> PolicyAction {
    PolicyAction::Project(ProjectAction::Read)
}

fn update() -> PolicyAction {
    PolicyAction::Project(ProjectAction::Update)
}

fn run() -> PolicyAction {
    PolicyAction::Workflow(WorkflowAction::Run)
}

fn allow(resources: Vec<Identifier>, actions: Vec<PolicyAction>) -> Statement {
    Statement::new(Effect::Allow, resources, actions).unwrap()
}

fn deny(resources: Vec<Identifier>, actions: Vec<PolicyAction>) -> Statement {
    Statement::new(Effect::Deny, resources, actions).unwrap()
}

#[test]
fn test_no_policies_grants_nothing() {
    let user = User::new("ada@example.com", "ada_l").unwrap();
    let project = Project::new("infra", "").unwrap();

    assert_eq!(
        user.permission(project.identifier(), read()),
        Effect::Unspecified
    );
}

#[test]
fn test_single_allow_grants_exactly_the_pair() {
    let mut user = User::new("ada@example.com", "ada_l").unwrap();
    let project = Project::new("infra", "").unwrap();
    let other = Project::new("sandbox", "").unwrap();

    let policy = Policy::new(
        project.identifier(),
        "readers",
        "read access to infra",
        vec![allow(vec![project.identifier().clone()], vec![read()])],
    )
    .unwrap();
    user.attach_policy(policy);

    assert_eq!(user.permission(project.identifier(), read()), Effect::Allow);
    // Same resource, uncovered action.
    assert_eq!(
        user.permission(project.identifier(), update()),
        Effect::Unspecified
    );
    // Covered action, different resource.
    assert_eq!(
        user.permission(other.identifier(), read()),
        Effect::Unspecified
    );
}

#[test]
fn test_deny_wins_within_one_policy_regardless_of_order() {
    let project = Project::new("infra", "").unwrap();
    let target = project.identifier().clone();

    let allow_then_deny = Policy::new(
        &target,
        "a",
        "",
        vec![
            allow(vec![target.clone()], vec![read()]),
            deny(vec![target.clone()], vec![read()]),
        ],
    )
    .unwrap();
    let deny_then_allow = Policy::new(
        &target,
        "b",
        "",
        vec![
            deny(vec![target.clone()], vec![read()]),
            allow(vec![target.clone()], vec![read()]),
        ],
    )
    .unwrap();

    assert_eq!(allow_then_deny.permission(&target, read()), Effect::Deny);
    assert_eq!(deny_then_allow.permission(&target, read()), Effect::Deny);
}

#[test]
fn test_deny_wins_across_attached_policies() {
    let mut user = User::new("ada@example.com", "ada_l").unwrap();
    let project = Project::new("infra", "").unwrap();
    let target = project.identifier().clone();

    let grants = Policy::new(
        &target,
        "grants",
        "",
        vec![allow(vec![target.clone()], vec![read(), update()])],
    )
    .unwrap();
    let guard = Policy::new(
        &target,
        "guard",
        "",
        vec![deny(vec![target.clone()], vec![update()])],
    )
    .unwrap();

    user.attach_policy(grants);
    user.attach_policy(guard);

    assert_eq!(user.permission(&target, read()), Effect::Allow);
    assert_eq!(user.permission(&target, update()), Effect::Deny);
}

#[test]
fn test_parent_grant_does_not_imply_child_resources() {
    // Resource matching is exact: a grant on the project does not cascade
    // to the workflows it owns.
    let mut user = User::new("ada@example.com", "ada_l").unwrap();
    let project = Project::new("infra", "").unwrap();
    let workflow = project.identifier().child(
        autops_core::identifier::ResourceType::Workflow,
    )
    .unwrap();

    let policy = Policy::new(
        project.identifier(),
        "p",
        "",
        vec![allow(vec![project.identifier().clone()], vec![run()])],
    )
    .unwrap();
    user.attach_policy(policy);

    assert_eq!(user.permission(&workflow, run()), Effect::Unspecified);
}

#[test]
fn test_detaching_the_denying_policy_restores_the_grant() {
    let mut user = User::new("ada@example.com", "ada_l").unwrap();
    let project = Project::new("infra", "").unwrap();
    let target = project.identifier().clone();

    let grants = Policy::new(
        &target,
        "grants",
        "",
        vec![allow(vec![target.clone()], vec![read()])],
    )
    .unwrap();
    let guard = Policy::new(
        &target,
        "guard",
        "",
        vec![deny(vec![target.clone()], vec![read()])],
    )
    .unwrap();
    let guard_id = guard.identifier().clone();

    user.attach_policy(grants);
    user.attach_policy(guard);
    assert_eq!(user.permission(&target, read()), Effect::Deny);

    user.detach_policy(&guard_id).unwrap();
    assert_eq!(user.permission(&target, read()), Effect::Allow);
}

#[test]
fn test_editing_statements_flips_the_outcome() {
    let project = Project::new("infra", "").unwrap();
    let target = project.identifier().clone();

    let mut policy = Policy::new(
        &target,
        "p",
        "",
        vec![allow(vec![target.clone()], vec![read()])],
    )
    .unwrap();
    assert_eq!(policy.permission(&target, read()), Effect::Allow);

    let statements = policy.statements_mut();
    statements.clear();
    statements.append(deny(vec![target.clone()], vec![read()]));

    assert_eq!(policy.permission(&target, read()), Effect::Deny);
}

#[test]
fn test_mixed_action_families_never_collide() {
    // project:Read and workflow:Read are distinct actions even though their
    // tokens match.
    let project = Project::new("infra", "").unwrap();
    let target = project.identifier().clone();

    let policy = Policy::new(
        &target,
        "p",
        "",
        vec![allow(
            vec![target.clone()],
            vec![PolicyAction::Workflow(WorkflowAction::Read)],
        )],
    )
    .unwrap();

    assert_eq!(
        policy.permission(&target, PolicyAction::Workflow(WorkflowAction::Read)),
        Effect::Allow
    );
    assert_eq!(policy.permission(&target, read()), Effect::Unspecified);
}
