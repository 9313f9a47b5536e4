use proptest::prelude::*;

use cohort_types::{Address, BasisPoints, PoolSplit, ProposalId, TokenAmount, BP_SCALE};

proptest! {
    /// Address order matches raw string order, so composite keys sort by it.
    #[test]
    fn address_order_matches_string_order(a in "[A-Z0-9]{1,40}", b in "[A-Z0-9]{1,40}") {
        prop_assert_eq!(Address::new(a.clone()).cmp(&Address::new(b.clone())), a.cmp(&b));
    }

    /// Well-formed alphanumeric principals of sane length are always valid.
    #[test]
    fn alphanumeric_addresses_are_valid(raw in "S[PT][A-Z0-9]{28,40}") {
        prop_assert!(Address::new(raw).is_valid());
    }

    /// Any address containing whitespace is rejected.
    #[test]
    fn whitespace_addresses_are_invalid(head in "[A-Z0-9]{1,10}", tail in "[A-Z0-9]{1,10}") {
        let address = Address::new(format!("{head} {tail}"));
        prop_assert!(!address.is_valid());
        prop_assert!(address.validate().is_err());
    }

    /// Proposal ids increase strictly under `next`.
    #[test]
    fn proposal_id_next_is_greater(raw in 0u64..u64::MAX) {
        let id = ProposalId::new(raw);
        let next = id.next().expect("below u64::MAX");
        prop_assert!(next > id);
        prop_assert_eq!(next.get(), raw + 1);
    }

    /// Whole-token display never overstates the raw amount.
    #[test]
    fn whole_tokens_round_down(raw in 0u128..u128::MAX / 2, decimals in 0u32..=18) {
        let whole = TokenAmount::new(raw).whole_tokens(decimals);
        let unit = 10u128.pow(decimals);
        prop_assert!(whole * unit <= raw);
        prop_assert!(raw - whole * unit < unit);
    }

    /// A split validates iff its four pools sum to exactly 10000.
    #[test]
    fn pool_split_validates_iff_exact(f in 0u32..10_001, p in 0u32..10_001, t in 0u32..10_001, v in 0u32..10_001) {
        let split = PoolSplit { founder_bp: f, participants_bp: p, treasury_bp: t, verifier_bp: v };
        prop_assert_eq!(split.validate().is_ok(), f + p + t + v == BP_SCALE);
    }

    /// Basis point sums never lose value.
    #[test]
    fn basis_points_sum(values in prop::collection::vec(0u32..=BP_SCALE, 0..50)) {
        let total: BasisPoints = values.iter().map(|v| BasisPoints::new(*v)).sum();
        prop_assert_eq!(total.get(), values.iter().sum::<u32>());
    }
}
