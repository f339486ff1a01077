//! Property-based tests for name parsing and root resolution.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::collections::HashSet;

use proptest::prelude::*;
use tfctl_cli::application::services::dispatch::{
    DispatchFlags, Request, build_invocation, parse_request,
};
use tfctl_cli::domain::UsageError;
use tfctl_common::{Action, Environment, Layer, RootId};

use crate::helpers::sample_repo;
use crate::mocks::FakeFs;

fn any_environment() -> impl Strategy<Value = Environment> {
    prop::sample::select(Environment::ALL.to_vec())
}

fn any_layer() -> impl Strategy<Value = Layer> {
    prop::sample::select(Layer::ALL.to_vec())
}

fn any_action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

proptest! {
    /// Strings outside the fixed set never parse as an environment.
    #[test]
    fn prop_unknown_environment_is_usage_error(name in "[a-zA-Z_-]{1,12}") {
        prop_assume!(!["dev", "stage", "prod"].contains(&name.as_str()));
        let err = parse_request(&name, "data", "plan").expect_err("must reject");
        prop_assert!(matches!(err, UsageError::InvalidName(_)));
        prop_assert!(err.to_string().contains(&name));
    }

    /// Strings outside the fixed set never parse as a layer.
    #[test]
    fn prop_unknown_layer_is_usage_error(name in "[a-zA-Z_-]{1,12}") {
        prop_assume!(!["platform", "data", "app"].contains(&name.as_str()));
        prop_assert!(parse_request("dev", &name, "plan").is_err());
    }

    /// Case variants are rejected: matching is exact.
    #[test]
    fn prop_names_are_case_sensitive(env in any_environment()) {
        let upper = env.as_str().to_uppercase();
        prop_assert!(parse_request(&upper, "app", "plan").is_err());
    }

    /// Every valid triple round-trips through its display names.
    #[test]
    fn prop_valid_triples_parse(env in any_environment(), layer in any_layer(), action in any_action()) {
        let (root, parsed) = parse_request(env.as_str(), layer.as_str(), action.as_str())
            .expect("valid names");
        prop_assert_eq!(root, RootId::new(env, layer));
        prop_assert_eq!(parsed, action);
    }

    /// The invocation always runs inside `live/<env>/<layer>` under the root.
    #[test]
    fn prop_invocation_cwd_is_the_root_directory(
        env in any_environment(),
        layer in any_layer(),
        action in any_action(),
    ) {
        let repo = sample_repo();
        let root = RootId::new(env, layer);
        let fs = FakeFs::new().with_dir(repo.root_dir(root));
        let request = Request { root, action, reconfigure: false, check: false };

        let inv = build_invocation(&fs, &repo, &request, &DispatchFlags::default())
            .expect("invocation");

        prop_assert_eq!(&inv.cwd, &repo.root.join("live").join(env.as_str()).join(layer.as_str()));
        prop_assert!(inv.cwd.is_absolute());
    }
}

#[test]
fn test_every_pair_resolves_to_a_unique_directory_and_state_key() {
    let repo = sample_repo();
    let dirs: HashSet<_> = RootId::all().map(|root| repo.root_dir(root)).collect();
    let keys: HashSet<_> = RootId::all().map(|root| root.state_key()).collect();
    assert_eq!(dirs.len(), 9);
    assert_eq!(keys.len(), 9);
}
