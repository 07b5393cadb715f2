use super::*;

#[test]
fn per_tick_budget_ignores_elapsed_time() {
    let mut r = RateControl::new(7, RateMode::ChunksPerTick);
    assert_eq!(r.budget(Duration::ZERO), 7);
    assert_eq!(r.budget(Duration::from_secs(3)), 7);
}

#[test]
fn decrease_clamps_at_zero() {
    let mut r = RateControl::new(5, RateMode::ChunksPerTick);
    r.decrease(33);
    assert_eq!(r.rate(), 0);
    assert_eq!(r.budget(Duration::from_millis(16)), 0);
    r.increase(33);
    assert_eq!(r.rate(), 33);
}

#[test]
fn per_second_budget_carries_fractions() {
    let mut r = RateControl::new(3, RateMode::ChunksPerSecond);
    let dt = Duration::from_millis(250);
    // 0.75 chunks per tick.
    let budgets: Vec<u32> = (0..4).map(|_| r.budget(dt)).collect();
    assert_eq!(budgets, vec![0, 1, 1, 1]);
}

#[test]
fn per_second_budget_scales_with_dt() {
    let mut r = RateControl::new(100, RateMode::ChunksPerSecond);
    assert_eq!(r.budget(Duration::from_millis(500)), 50);
    assert_eq!(r.budget(Duration::ZERO), 0);
}
