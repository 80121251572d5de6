//! O(n) performance verification for TokenStream

use super::tokenize::{test_counter, TokenStream};

fn with_step_counter<F: FnOnce()>(f: F) -> usize {
    test_counter::reset();
    f();
    test_counter::get()
}

fn steps_per_byte(text: &str) -> f64 {
    let steps = with_step_counter(|| {
        let mut stream = TokenStream::new(text);
        while stream.next().is_some() {}
    });
    steps as f64 / text.len() as f64
}

#[test]
fn test_tokenstream_o_n_performance() {
    let make = |n: usize| {
        (0..n)
            .map(|i| format!("<%= token{} %> ", i))
            .collect::<String>()
    };

    let spb_100 = steps_per_byte(&make(100));
    let spb_1000 = steps_per_byte(&make(1000));
    let spb_10000 = steps_per_byte(&make(10000));

    // Each byte is visited at most twice (state change + reprocess)
    for spb in [spb_100, spb_1000, spb_10000] {
        assert!(spb <= 2.0, "steps per byte too high: {}", spb);
    }
}

#[test]
fn test_tokenstream_pathological_input_is_linear() {
    let text = "<".repeat(5000) + &"%".repeat(5000);
    let spb = steps_per_byte(&text);
    assert!(spb <= 2.0, "steps per byte too high: {}", spb);
}
