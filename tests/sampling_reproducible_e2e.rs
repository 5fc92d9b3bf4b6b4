use sortxfer::{recolor, transport_cost, ChannelWeights, PixelSet, SearchConfig};

fn noise(n: usize, mut state: u32) -> Vec<[u8; 3]> {
    // xorshift: fixed, dependency-free test data.
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let b = state.to_le_bytes();
            [b[0], b[1], b[2]]
        })
        .collect()
}

#[test]
fn same_seed_same_image() {
    let target = PixelSet::from_rgb(&noise(500, 1));
    let source = PixelSet::from_rgb(&noise(500, 2));
    let config = SearchConfig::random_sampling(12).with_seed(2024);

    let a = recolor(&target, &source, &config).unwrap();
    let b = recolor(&target, &source, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sampling_reports_evaluations_and_quality() {
    let target = PixelSet::from_rgb(&noise(300, 11));
    let source = PixelSet::from_rgb(&noise(300, 12));
    let out = recolor(&target, &source, &SearchConfig::random_sampling(20).with_seed(5)).unwrap();

    assert_eq!(out.outcome.evaluations, 21);
    assert!(out.outcome.quality > 0.0 && out.outcome.quality <= 1.0);
    assert!(out.outcome.cost > 0.0);

    // The reported cost is the cost of the returned pairing.
    let again = transport_cost(&target, &source, &out.outcome.direction, ChannelWeights::UNIFORM).unwrap();
    assert_eq!(out.outcome.cost, again);
}

#[test]
fn sweep_is_reproducible_without_seed() {
    let target = PixelSet::from_rgb(&noise(400, 21));
    let source = PixelSet::from_rgb(&noise(400, 22));
    let a = recolor(&target, &source, &SearchConfig::axis_sweep()).unwrap();
    let b = recolor(&target, &source, &SearchConfig::axis_sweep()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.outcome.sweeps.len(), 3);
}
