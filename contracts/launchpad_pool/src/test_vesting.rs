use crate::invariants::assert_claimed_within_entitlement;
use crate::vesting::{div_wad, entitlement, vested_amount, DEFAULT_LINEAR_DURATION};
use crate::{Address, EngineParams, Error, LaunchpadPool, PoolParams, VestingCurve, WAD};

const DAY: u64 = 86_400;
const NOW: u64 = 1_700_000_000;
const END: u64 = NOW + 30 * DAY;

fn setup(params: EngineParams) -> (LaunchpadPool, u64, Address) {
    let mut engine = LaunchpadPool::new(params);
    let investor = Address::from("investor1");
    let pool_id = engine
        .create_pool(
            NOW,
            &Address::from("owner"),
            PoolParams {
                token: Address::from("mock-token"),
                token_price: WAD / 10,
                soft_cap: 10_000 * WAD,
                hard_cap: 50_000 * WAD,
                start_time: NOW,
                end_time: END,
            },
        )
        .unwrap()
        .value;
    engine.invest(NOW, &investor, pool_id, WAD).unwrap();
    (engine, pool_id, investor)
}

fn linear() -> EngineParams {
    EngineParams::new(
        30 * DAY,
        VestingCurve::Linear {
            duration: DEFAULT_LINEAR_DURATION,
        },
    )
    .unwrap()
}

// ─────────────────────────────────────────────────────────
// Math
// ─────────────────────────────────────────────────────────

#[test]
fn test_entitlement_is_amount_over_price() {
    // 1 unit at 0.1 per token buys 10 tokens.
    assert_eq!(entitlement(WAD, WAD / 10).unwrap(), 10 * WAD);
    assert_eq!(entitlement(50_000 * WAD, WAD / 10).unwrap(), 500_000 * WAD);
    assert_eq!(entitlement(3 * WAD, 2 * WAD).unwrap(), 3 * WAD / 2);
    assert_eq!(entitlement(0, WAD).unwrap(), 0);
    assert_eq!(entitlement(WAD, 0).unwrap_err(), Error::InvalidTokenPrice);
}

#[test]
fn test_div_wad_rounds_down() {
    // 1 / 3 = 0.333...333 with 18 decimals.
    assert_eq!(div_wad(1, 3).unwrap(), 333_333_333_333_333_333);
    assert_eq!(div_wad(2 * WAD, 3 * WAD).unwrap(), 666_666_666_666_666_666);
    // Large amounts that would overflow a naive `amount * WAD` still divide.
    let huge = u128::MAX / 1_000;
    assert!(huge.checked_mul(WAD).is_none());
    assert_eq!(div_wad(huge, huge).unwrap(), WAD);
    assert_eq!(div_wad(u128::MAX, 1), None);
}

#[test]
fn test_div_wad_handles_divisors_near_u128_max() {
    let price = 100_000_000_000_000_000_000 * WAD; // 1e38
    let amount = 50_000_000_000_000_000_000 * WAD; // 5e37
    assert_eq!(div_wad(amount, price).unwrap(), WAD / 2);
    assert_eq!(div_wad(u128::MAX, u128::MAX).unwrap(), WAD);
    assert_eq!(div_wad(u128::MAX - 1, u128::MAX).unwrap(), WAD - 1);
}

#[test]
fn test_claim_with_very_large_token_price() {
    let mut engine = LaunchpadPool::new(EngineParams::default());
    let investor = Address::from("whale");
    let price = 100_000_000_000_000_000_000 * WAD;
    let pool_id = engine
        .create_pool(
            NOW,
            &Address::from("owner"),
            PoolParams {
                token: Address::from("mock-token"),
                token_price: price,
                soft_cap: WAD,
                hard_cap: price,
                start_time: NOW,
                end_time: END,
            },
        )
        .unwrap()
        .value;
    engine
        .invest(NOW, &investor, pool_id, price / 2)
        .unwrap();

    let schedule = engine.get_vesting_schedule(&investor, pool_id).unwrap();
    assert_eq!(schedule.total_entitlement, WAD / 2);

    let released = engine
        .claim_tokens(END + 31 * DAY, &investor, pool_id)
        .unwrap()
        .value;
    assert_eq!(released, WAD / 2);
}

#[test]
fn test_vested_amount_cliff_release() {
    let params = EngineParams::default();
    let cliff_end = END + 30 * DAY;

    assert_eq!(vested_amount(1_000, END, cliff_end - 1, &params).unwrap(), 0);
    assert_eq!(vested_amount(1_000, END, cliff_end, &params).unwrap(), 1_000);
    assert_eq!(vested_amount(1_000, END, u64::MAX, &params).unwrap(), 1_000);
}

#[test]
fn test_vested_amount_linear() {
    let params = linear();
    let total = 180 * WAD;

    assert_eq!(vested_amount(total, END, END + 29 * DAY, &params).unwrap(), 0);
    // At the cliff, the 30 days accrued so far unlock together.
    assert_eq!(vested_amount(total, END, END + 30 * DAY, &params).unwrap(), 30 * WAD);
    assert_eq!(vested_amount(total, END, END + 90 * DAY, &params).unwrap(), 90 * WAD);
    assert_eq!(vested_amount(total, END, END + 180 * DAY, &params).unwrap(), total);
    assert_eq!(vested_amount(total, END, END + 400 * DAY, &params).unwrap(), total);
    // No overflow for entitlements near the top of the range.
    let big = u128::MAX - 7;
    assert!(vested_amount(big, END, END + 90 * DAY, &params).unwrap() <= big / 2 + 1);
}

#[test]
fn test_engine_params_validation() {
    assert_eq!(
        EngineParams::new(30 * DAY, VestingCurve::Linear { duration: 0 }).unwrap_err(),
        Error::InvalidVestingConfig
    );
    assert_eq!(
        EngineParams::new(30 * DAY, VestingCurve::Linear { duration: DAY }).unwrap_err(),
        Error::InvalidVestingConfig
    );
    let params = EngineParams::new(0, VestingCurve::CliffRelease).unwrap();
    assert_eq!(params.cliff_duration(), 0);
    assert_eq!(EngineParams::default().cliff_duration(), 30 * DAY);
}

// ─────────────────────────────────────────────────────────
// claim_tokens
// ─────────────────────────────────────────────────────────

#[test]
fn test_claim_after_cliff_releases_entitlement() {
    let (mut engine, pool_id, investor) = setup(EngineParams::default());
    let later = END + 31 * DAY;

    let receipt = engine.claim_tokens(later, &investor, pool_id).unwrap();

    assert_eq!(receipt.value, 10 * WAD);
    let schedule = engine.get_vesting_schedule(&investor, pool_id).unwrap();
    assert!(schedule.claimed_amount > 0);
    assert_eq!(schedule.claimed_amount, 10 * WAD);
    assert!(schedule.is_fully_claimed());
    assert_claimed_within_entitlement(&schedule);
}

#[test]
fn test_early_claim_is_rejected() {
    let (mut engine, pool_id, investor) = setup(EngineParams::default());

    assert_eq!(
        engine.claim_tokens(NOW, &investor, pool_id).unwrap_err(),
        Error::CliffNotElapsed
    );
    assert_eq!(
        engine
            .claim_tokens(END + 30 * DAY - 1, &investor, pool_id)
            .unwrap_err(),
        Error::CliffNotElapsed
    );
    // Exactly at the cliff the claim goes through.
    engine
        .claim_tokens(END + 30 * DAY, &investor, pool_id)
        .unwrap();
}

#[test]
fn test_second_claim_has_nothing_left() {
    let (mut engine, pool_id, investor) = setup(EngineParams::default());
    let later = END + 31 * DAY;
    engine.claim_tokens(later, &investor, pool_id).unwrap();
    let before = engine.clone();

    assert_eq!(
        engine.claim_tokens(later, &investor, pool_id).unwrap_err(),
        Error::NothingToClaim
    );
    assert_eq!(engine, before);
}

#[test]
fn test_claim_without_investment() {
    let (mut engine, pool_id, _) = setup(EngineParams::default());
    assert_eq!(
        engine
            .claim_tokens(END + 31 * DAY, &Address::from("stranger"), pool_id)
            .unwrap_err(),
        Error::NoEntitlement
    );
}

#[test]
fn test_no_entitlement_is_checked_before_cliff() {
    let (mut engine, pool_id, _) = setup(EngineParams::default());
    assert_eq!(
        engine
            .claim_tokens(NOW, &Address::from("stranger"), pool_id)
            .unwrap_err(),
        Error::NoEntitlement
    );
}

#[test]
fn test_claim_unknown_pool() {
    let (mut engine, _, investor) = setup(EngineParams::default());
    assert_eq!(
        engine.claim_tokens(END + 31 * DAY, &investor, 9).unwrap_err(),
        Error::PoolNotFound
    );
}

#[test]
fn test_linear_claims_accumulate_to_entitlement() {
    let (mut engine, pool_id, investor) = setup(linear());
    let entitlement = 10 * WAD;

    let first = engine
        .claim_tokens(END + 30 * DAY, &investor, pool_id)
        .unwrap()
        .value;
    assert_eq!(first, entitlement / 6);

    assert_eq!(
        engine
            .claim_tokens(END + 30 * DAY, &investor, pool_id)
            .unwrap_err(),
        Error::NothingToClaim
    );

    let second = engine
        .claim_tokens(END + 90 * DAY, &investor, pool_id)
        .unwrap()
        .value;
    let third = engine
        .claim_tokens(END + 365 * DAY, &investor, pool_id)
        .unwrap()
        .value;

    assert_eq!(first + second + third, entitlement);
    let schedule = engine.get_vesting_schedule(&investor, pool_id).unwrap();
    assert_eq!(schedule.claimed_amount, entitlement);
    assert_eq!(schedule.remaining(), 0);
    assert_claimed_within_entitlement(&schedule);
}

// ─────────────────────────────────────────────────────────
// Views
// ─────────────────────────────────────────────────────────

#[test]
fn test_vesting_schedule_before_any_claim() {
    let (engine, pool_id, investor) = setup(EngineParams::default());

    let schedule = engine.get_vesting_schedule(&investor, pool_id).unwrap();

    assert_eq!(schedule.total_entitlement, 10 * WAD);
    assert_eq!(schedule.claimed_amount, 0);
    assert_eq!(schedule.cliff_end, END + 30 * DAY);
    assert_eq!(schedule.vesting_end, END + 30 * DAY);
    assert!(!schedule.is_fully_claimed());
}

#[test]
fn test_vesting_schedule_for_stranger_is_zero() {
    let (engine, pool_id, _) = setup(EngineParams::default());
    let schedule = engine
        .get_vesting_schedule(&Address::from("stranger"), pool_id)
        .unwrap();
    assert_eq!(schedule.total_entitlement, 0);
    assert_eq!(
        engine
            .get_vesting_schedule(&Address::from("stranger"), 4)
            .unwrap_err(),
        Error::PoolNotFound
    );
}

#[test]
fn test_linear_schedule_end() {
    let (engine, pool_id, investor) = setup(linear());
    let schedule = engine.get_vesting_schedule(&investor, pool_id).unwrap();
    assert_eq!(schedule.cliff_end, END + 30 * DAY);
    assert_eq!(schedule.vesting_end, END + 180 * DAY);
}

#[test]
fn test_claimable_tracks_claims() {
    let (mut engine, pool_id, investor) = setup(linear());

    assert_eq!(engine.claimable(END, &investor, pool_id).unwrap(), 0);
    let at_90 = engine
        .claimable(END + 90 * DAY, &investor, pool_id)
        .unwrap();
    assert_eq!(at_90, 5 * WAD);

    engine
        .claim_tokens(END + 90 * DAY, &investor, pool_id)
        .unwrap();
    assert_eq!(
        engine
            .claimable(END + 90 * DAY, &investor, pool_id)
            .unwrap(),
        0
    );
}
