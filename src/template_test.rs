use super::*;
use crate::Error;

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn cluster_bindings() -> Bindings {
    let mut bindings = Bindings::default();
    bindings.bind_endpoint("hyperdex", "127.0.0.1", 1982);
    bindings.bind_endpoint("wtf", "127.0.0.1", 2982);
    bindings
}

#[test]
fn test_render_substitutes_every_placeholder() {
    let template = CommandTemplate::parse(args(&[
        "./test-client",
        "--host={WTF_HOST}",
        "{WTF_PORT}",
        "{HYPERDEX_HOST}:{HYPERDEX_PORT}",
    ]))
    .unwrap();

    let rendered = template.render(&cluster_bindings()).unwrap();

    assert_eq!(
        rendered,
        args(&["./test-client", "--host=127.0.0.1", "2982", "127.0.0.1:1982"])
    );
    assert!(rendered.iter().all(|arg| !arg.contains('{') && !arg.contains('}')));
}

#[test]
fn test_double_braces_are_literal() {
    let template = CommandTemplate::parse(args(&["echo", "{{WTF_PORT}}", "}}{{"])).unwrap();

    assert_eq!(
        template.render(&Bindings::default()).unwrap(),
        args(&["echo", "{WTF_PORT}", "}{"])
    );
}

#[test]
fn test_empty_argument_survives() {
    let template = CommandTemplate::parse(args(&["printf", ""])).unwrap();
    assert_eq!(template.render(&Bindings::default()).unwrap(), args(&["printf", ""]));
}

#[test]
fn test_repeated_placeholder_renders_every_occurrence() {
    let mut bindings = Bindings::default();
    bindings.bind_endpoint("wtf", "127.0.0.1", 2982);
    let template = CommandTemplate::parse(args(&["{WTF_HOST}", "{WTF_HOST}:{WTF_PORT}"])).unwrap();

    assert_eq!(
        template.render(&bindings).unwrap(),
        args(&["127.0.0.1", "127.0.0.1:2982"])
    );
}

#[test]
fn test_unknown_token_is_rejected_before_rendering() {
    let template = CommandTemplate::parse(args(&["run", "--port={WTF_PROT}"])).unwrap();

    let err = template.check(&cluster_bindings()).unwrap_err();

    match err {
        Error::Template(TemplateError::UnknownToken { token, arg }) => {
            assert_eq!(token, "WTF_PROT");
            assert_eq!(arg, "--port={WTF_PROT}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_templates_fail_to_parse() {
    assert!(matches!(
        CommandTemplate::parse(vec![]),
        Err(Error::Template(TemplateError::Empty))
    ));
    assert!(matches!(
        CommandTemplate::parse(args(&["{WTF_HOST"])),
        Err(Error::Template(TemplateError::Unterminated(_)))
    ));
    assert!(matches!(
        CommandTemplate::parse(args(&["a}b"])),
        Err(Error::Template(TemplateError::UnmatchedBrace(_)))
    ));
    assert!(matches!(
        CommandTemplate::parse(args(&["{}"])),
        Err(Error::Template(TemplateError::UnknownToken { .. }))
    ));
}
