#[test]
fn zelo_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/zelo_error_pass.rs");
    t.pass("tests/ui/zelo_error_context.rs");
}
