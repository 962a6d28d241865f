#[test]
fn atlas_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/atlas_error_pass.rs");
    t.compile_fail("tests/ui/atlas_error_source_without_context.rs");
    t.compile_fail("tests/ui/atlas_error_tuple_variant.rs");
}
