#[macro_export]
macro_rules! assert_at_most_one_feature {
    ($($feature:literal),+ $(,)?) => {
        assert!(
            (0 $(+ cfg!(feature = $feature) as usize)+ ) <= 1,
            "At most one of the following features may be enabled: {}",
            [$($feature),+].join(", ")
        );
    };
}

fn main() {
    // NOTE: update when adding new device support!
    // Chip features are optional, the driver itself only needs embedded-hal
    // pins. When one is given it must match the target.
    assert_at_most_one_feature!("esp32", "esp32c6", "esp32s3");
    assert_at_most_one_feature!("log", "defmt");

    #[cfg(feature = "esp32")]
    assert_target("esp32", "xtensa-esp32-none-elf");

    #[cfg(feature = "esp32s3")]
    assert_target("esp32s3", "xtensa-esp32s3-none-elf");

    #[cfg(feature = "esp32c6")]
    assert_target("esp32c6", "riscv32imac-unknown-none-elf");
}

#[cfg(any(feature = "esp32", feature = "esp32s3", feature = "esp32c6"))]
fn assert_target(feature: &str, expected: &str) {
    let target = std::env::var("TARGET").unwrap_or_default();
    assert!(
        target == expected,
        "feature {} does not match target {}",
        feature,
        target
    );
}
