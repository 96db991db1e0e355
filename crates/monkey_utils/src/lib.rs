pub mod peek;

/// Inline snapshot assertion that records the source text the output was
/// produced from, so a failing snapshot shows what was being tested.
#[macro_export]
macro_rules! assert_snapshot_with_source {
    ($source:expr => $output:expr, @$snapshot:literal) => {{
        insta::with_settings!({
            description => $source,
            omit_expression => true,
        }, {
            insta::assert_snapshot!($output, @$snapshot);
        })
    }};
}
