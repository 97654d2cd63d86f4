//! Tests for bottle ledger rules
//!
//! Covers state codes, terminal states, folio validation and the transfer
//! guard ordering.

use proptest::prelude::*;
use uuid::Uuid;

use shared::{validate_folio, validate_weight_g, BottleState};

/// Mirrors the transfer guard chain: the first failing guard names the
/// error, so the order is observable by callers.
fn transfer_guard(
    state: BottleState,
    current_warehouse: Uuid,
    destination: Uuid,
) -> Result<(), &'static str> {
    if state == BottleState::Empty {
        return Err("empty");
    }
    if state == BottleState::Lost {
        return Err("lost");
    }
    if current_warehouse == destination {
        return Err("same_warehouse");
    }
    Ok(())
}

// =============================================================================
// State codes
// =============================================================================

mod state_codes {
    use super::*;

    #[test]
    fn state_round_trip() {
        for state in [
            BottleState::New,
            BottleState::WithLiquid,
            BottleState::Empty,
            BottleState::Lost,
        ] {
            assert_eq!(BottleState::from_str(state.as_str()), Some(state));
        }
    }

    #[test]
    fn unknown_state_rejected() {
        assert_eq!(BottleState::from_str("broken"), None);
        assert_eq!(BottleState::from_str("EMPTY"), None);
    }

    #[test]
    fn only_empty_and_lost_are_terminal() {
        assert!(!BottleState::New.is_terminal());
        assert!(!BottleState::WithLiquid.is_terminal());
        assert!(BottleState::Empty.is_terminal());
        assert!(BottleState::Lost.is_terminal());
    }
}

// =============================================================================
// Transfer guards
// =============================================================================

mod transfer_guards {
    use super::*;

    #[test]
    fn liquid_bottle_transfers() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(transfer_guard(BottleState::WithLiquid, a, b).is_ok());
        assert!(transfer_guard(BottleState::New, a, b).is_ok());
    }

    #[test]
    fn empty_bottle_rejected() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(transfer_guard(BottleState::Empty, a, b), Err("empty"));
    }

    #[test]
    fn lost_bottle_rejected() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(transfer_guard(BottleState::Lost, a, b), Err("lost"));
    }

    #[test]
    fn same_warehouse_rejected() {
        let a = Uuid::new_v4();
        assert_eq!(
            transfer_guard(BottleState::WithLiquid, a, a),
            Err("same_warehouse")
        );
    }

    #[test]
    fn state_guard_fires_before_destination_guard() {
        // An empty bottle already in the destination reports "empty"
        let a = Uuid::new_v4();
        assert_eq!(transfer_guard(BottleState::Empty, a, a), Err("empty"));
        assert_eq!(transfer_guard(BottleState::Lost, a, a), Err("lost"));
    }
}

// =============================================================================
// Folio and weight validation
// =============================================================================

mod validation {
    use super::*;

    #[test]
    fn accepts_label_folios() {
        assert!(validate_folio("Ii0000000001").is_ok());
        assert!(validate_folio("Nn1644803750").is_ok());
        assert!(validate_folio("1").is_ok());
    }

    #[test]
    fn rejects_bad_folios() {
        assert!(validate_folio("").is_err());
        assert!(validate_folio("   ").is_err());
        assert!(validate_folio("Ii00000000012").is_err()); // 13 chars
        assert!(validate_folio("Ii-000000001").is_err());
    }

    #[test]
    fn rejects_non_positive_weights() {
        assert!(validate_weight_g(0).is_err());
        assert!(validate_weight_g(-10).is_err());
        assert!(validate_weight_g(1).is_ok());
    }
}

// =============================================================================
// Property tests
// =============================================================================

fn state_strategy() -> impl Strategy<Value = BottleState> {
    prop_oneof![
        Just(BottleState::New),
        Just(BottleState::WithLiquid),
        Just(BottleState::Empty),
        Just(BottleState::Lost),
    ]
}

proptest! {
    /// Terminal states never pass the transfer guard.
    #[test]
    fn terminal_states_never_transfer(state in state_strategy()) {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let allowed = transfer_guard(state, a, b).is_ok();
        prop_assert_eq!(allowed, !state.is_terminal());
    }

    /// Folio validation accepts exactly the 1-12 alphanumeric strings.
    #[test]
    fn folio_acceptance_law(folio in "[A-Za-z0-9]{1,12}") {
        prop_assert!(validate_folio(&folio).is_ok());
    }

    #[test]
    fn overlong_folios_rejected(folio in "[A-Za-z0-9]{13,20}") {
        prop_assert!(validate_folio(&folio).is_err());
    }
}
