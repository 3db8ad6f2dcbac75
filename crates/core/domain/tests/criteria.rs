use domain::Criteria;

#[test]
fn rule_is_subset_of_state() {
    let arp = Criteria::with_dl_type(0x0806);
    let ipv4 = Criteria::with_dl_type(0x0800);
    let any = Criteria::wildcard();

    // 规则 {dl_type=0x0800}
    assert!(ipv4.matches(&ipv4));
    assert!(!ipv4.matches(&arp));
    assert!(!ipv4.matches(&any));

    // 通配规则
    assert!(any.matches(&ipv4));
    assert!(any.matches(&arp));
    assert!(any.matches(&any));
}

#[test]
fn builder_sets_bits() {
    let rule = Criteria::wildcard().and_dl_type(0x86dd);
    assert_eq!(rule.dl_type(), Some(0x86dd));
    assert!(!rule.is_wildcard());
    assert!(Criteria::default().is_wildcard());
}
