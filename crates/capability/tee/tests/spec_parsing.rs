use domain::Criteria;
use oftee_tee::{Destination, EndpointSpec, TeeError};

fn parse(spec: &str) -> EndpointSpec {
    EndpointSpec::parse(spec).expect("parse").expect("non-empty")
}

#[test]
fn bare_tcp_url_is_wildcard() {
    let spec = parse("tcp://host:1234");
    assert_eq!(spec.destination, Destination::Tcp("host:1234".to_string()));
    assert!(spec.criteria.is_wildcard());
}

#[test]
fn bare_host_port_is_tcp() {
    assert_eq!(
        parse("collector:9000").destination,
        Destination::Tcp("collector:9000".to_string())
    );
    assert_eq!(
        parse(":8002").destination,
        Destination::Tcp("127.0.0.1:8002".to_string())
    );
}

#[test]
fn terms_set_destination_and_rule() {
    let spec = parse("dl_type=0x0806;action=tcp://host:9");
    assert_eq!(spec.destination, Destination::Tcp("host:9".to_string()));
    assert_eq!(spec.criteria, Criteria::with_dl_type(0x0806));

    // 顺序无关，键名大小写不敏感，十进制取值
    let spec = parse("ACTION=tcp://host:9; DL_TYPE=2048");
    assert_eq!(spec.criteria, Criteria::with_dl_type(0x0800));
}

#[test]
fn http_destination_keeps_full_url() {
    let spec = parse("dl_type=0x88cc;action=http://collector:8080/lldp?src=oftee");
    match spec.destination {
        Destination::Http(url) => {
            assert_eq!(url.as_str(), "http://collector:8080/lldp?src=oftee");
        }
        other => panic!("unexpected destination {:?}", other),
    }
    assert_eq!(spec.criteria.dl_type(), Some(0x88cc));

    let spec = parse("http://collector/all");
    assert!(matches!(spec.destination, Destination::Http(_)));
    assert!(spec.criteria.is_wildcard());
}

#[test]
fn unknown_term_is_error() {
    assert!(matches!(
        EndpointSpec::parse("foo=bar"),
        Err(TeeError::UnknownTerm(key)) if key == "foo"
    ));
    assert!(matches!(
        EndpointSpec::parse("dl_type=0x0800;foo=bar;action=tcp://h:1"),
        Err(TeeError::UnknownTerm(_))
    ));
}

#[test]
fn bad_values_are_errors() {
    assert!(matches!(
        EndpointSpec::parse("dl_type=ip;action=tcp://h:1"),
        Err(TeeError::InvalidValue { .. })
    ));
    assert!(matches!(
        EndpointSpec::parse("dl_type=0x10000;action=tcp://h:1"),
        Err(TeeError::InvalidValue { .. })
    ));
    assert!(matches!(
        EndpointSpec::parse("dl_type;action=tcp://h:1"),
        Err(TeeError::MalformedTerm(_))
    ));
    assert!(matches!(
        EndpointSpec::parse("dl_type=0x0800"),
        Err(TeeError::InvalidAddress(..))
    ));
    assert!(matches!(
        EndpointSpec::parse("tcp://host"),
        Err(TeeError::InvalidAddress(..))
    ));
    assert!(matches!(
        EndpointSpec::parse("nohostport"),
        Err(TeeError::InvalidAddress(..))
    ));
}

#[test]
fn parse_all_skips_empty_and_keeps_order() {
    let specs = vec![
        "tcp://a:1".to_string(),
        "".to_string(),
        "dl_type=0x0806;action=tcp://b:2".to_string(),
    ];
    let parsed = EndpointSpec::parse_all(&specs).expect("parse");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].destination, Destination::Tcp("a:1".to_string()));
    assert_eq!(parsed[1].destination, Destination::Tcp("b:2".to_string()));
}
