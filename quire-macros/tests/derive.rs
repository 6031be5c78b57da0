#[test]
fn permission_catalog_expands() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/catalog_ok.rs");
}
