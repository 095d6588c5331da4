//! Behaviour of the generated client, run with node
//!
//! A generated module plus a small harness (`runtime/harness.mts`, with a
//! stub `XMLHttpRequest`) is written to a temporary `.mts` file and run by
//! node with type stripping. Each script prints one JSON value per line.
//! Tests are skipped when no node with type stripping is on PATH.

#![allow(non_snake_case)]

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use sherpats_core::{BaseUrl, GenerateOptions, generate_from_json};

const NODE_ARGS: &[&str] = &["--experimental-strip-types", "--no-warnings"];

const HARNESS: &str = include_str!("runtime/harness.mts");

// Only erasable TypeScript: no enums, no namespace.
const DOC: &str = r#"{
    "Name": "Behaviour",
    "Docs": "",
    "Functions": [
        {"Name": "Put", "Params": [{"Name": "item", "Typewords": ["Item"]}], "Returns": [{"Typewords": ["Item"]}]},
        {"Name": "Count", "Params": [{"Name": "n", "Typewords": ["nullable", "int32"]}], "Returns": [{"Typewords": ["nullable", "int32"]}]},
        {"Name": "Pair", "Params": [], "Returns": [{"Typewords": ["string"]}, {"Typewords": ["int32"]}]},
        {"Name": "When", "Params": [{"Name": "t", "Typewords": ["timestamp"]}], "Returns": [{"Typewords": ["timestamp"]}]},
        {"Name": "Totals", "Params": [{"Name": "m", "Typewords": ["{}", "int32"]}], "Returns": []},
        {"Name": "Raw", "Params": [{"Name": "v", "Typewords": ["any"]}], "Returns": []},
        {"Name": "Local", "Params": [{"Name": "params", "Typewords": ["int32"]}, {"Name": "fn", "Typewords": ["string"]}], "Returns": []}
    ],
    "Structs": [
        {"Name": "Item", "Fields": [
            {"Name": "type", "Typewords": ["string"]},
            {"Name": "Note", "Typewords": ["nullable", "string"]}
        ]}
    ],
    "SherpadocVersion": 1
}"#;

fn run_node(path: &Path) -> std::process::Output {
    Command::new("node")
        .args(NODE_ARGS)
        .arg(path)
        .output()
        .expect("Failed to run node")
}

fn node_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let Ok(dir) = tempfile::tempdir() else {
            return false;
        };
        let path = dir.path().join("detect.mts");
        if std::fs::write(&path, "const n: number = 1\nconsole.log(n)\n").is_err() {
            return false;
        }
        Command::new("node")
            .args(NODE_ARGS)
            .arg(&path)
            .output()
            .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "1")
            .unwrap_or(false)
    })
}

/// Generate the client for `DOC`, append harness and script, run it and
/// return the printed lines. `None` when node is unavailable.
fn run_client(options: &GenerateOptions, script: &str) -> Option<Vec<String>> {
    if !node_available() {
        eprintln!("skipping: node with TypeScript type stripping not found");
        return None;
    }
    let module = generate_from_json(
        DOC.as_bytes(),
        &BaseUrl::parse("http://sherpa.test/behaviour/"),
        options,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.mts");
    std::fs::write(&path, format!("{module}\n{HARNESS}\n{script}\n")).unwrap();

    let output = run_node(&path);
    assert!(
        output.status.success(),
        "node failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    Some(
        String::from_utf8(output.stdout)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect(),
    )
}

// ============================================================================
// Struct fields
// ============================================================================

#[test]
fn client___renamed_field___maps_between_ident_and_wire_name() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
StubXHR.handler = (req) => req.respond(200, { result: JSON.parse(req.body).params[0] })
show(await settle(client.Put({ type0: 'x', Note: null })))
show(JSON.parse(StubXHR.sent[0].body))
show(StubXHR.sent[0].url)
show(await settle(client.Put({ type: 'x', Note: null })))
StubXHR.handler = (req) => req.respond(200, { result: { type0: 'x', Note: null } })
show(await settle(client.Put({ type0: 'x', Note: null })))
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#"{"ok":{"type0":"x","Note":null}}"#,
            r#"{"params":[{"type":"x","Note":null}]}"#,
            r#""http://sherpa.test/behaviour/Put""#,
            r#"{"err":"sherpa:badParams"}"#,
            r#"{"err":"sherpa:badReturn"}"#,
        ]
    );
}

#[test]
fn client___nullable_optional___absent_member_allowed_only_when_enabled() {
    let script = r#"
StubXHR.handler = (req) => req.respond(200, { result: JSON.parse(req.body).params[0] })
show(await settle(client.Put({ type0: 'x' })))
"#;

    let Some(off) = run_client(&GenerateOptions::default(), script) else {
        return;
    };
    let Some(on) = run_client(&GenerateOptions::new().with_nullable_optional(true), script) else {
        return;
    };

    assert_eq!(off, [r#"{"err":"sherpa:badParams"}"#]);
    assert_eq!(on, [r#"{"ok":{"type0":"x"}}"#]);
}

#[test]
fn client___params_named_like_method_locals___are_sent() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
StubXHR.handler = (req) => req.respond(200, { result: null })
show(await settle(client.Local(1, 'x')))
show(JSON.parse(StubXHR.sent[0].body))
"#,
    ) else {
        return;
    };

    assert_eq!(lines, ["{}", r#"{"params":[1,"x"]}"#]);
}

// ============================================================================
// Value validation
// ============================================================================

#[test]
fn normalize___nullable_int32___accepts_null_and_integers_only() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
for (const v of [null, 0, 3, -7, '3', 1.5, true]) {
	show(check(() => _normalize(v, ['nullable', 'int32'], 'toServer', 'v')))
}
show(await settle(client.Count('3')))
show(StubXHR.sent.length)
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            "null",
            "0",
            "3",
            "-7",
            r#""rejected""#,
            r#""rejected""#,
            r#""rejected""#,
            r#"{"err":"sherpa:badParams"}"#,
            "0",
        ]
    );
}

#[test]
fn normalize___map___validates_every_value() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
show(check(() => _normalize({ a: 1, b: 2 }, ['{}', 'int32'], 'toServer', 'm')))
show(check(() => _normalize({ a: 1, b: 'x' }, ['{}', 'int32'], 'toServer', 'm')))
show(check(() => _normalize([1], ['{}', 'int32'], 'toServer', 'm')))
show(check(() => _normalize(null, ['{}', 'int32'], 'toServer', 'm')))
show(check(() => _normalize({}, ['{}', 'int32'], 'toServer', 'm')))
show(await settle(client.Totals({ a: 1.5 })))
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#"{"a":1,"b":2}"#,
            r#""rejected""#,
            r#""rejected""#,
            r#""rejected""#,
            "{}",
            r#"{"err":"sherpa:badParams"}"#,
        ]
    );
}

#[test]
fn normalize___array___nullable_only_with_slices_nullable() {
    let script = r#"
show(check(() => _normalize(null, ['[]', 'string'], 'fromServer', 'v')))
show(check(() => _normalize(['a'], ['[]', 'string'], 'fromServer', 'v')))
show(check(() => _normalize(['a', 1], ['[]', 'string'], 'fromServer', 'v')))
"#;

    let Some(off) = run_client(&GenerateOptions::default(), script) else {
        return;
    };
    let Some(on) = run_client(&GenerateOptions::new().with_slices_nullable(true), script) else {
        return;
    };

    assert_eq!(off, [r#""rejected""#, r#"["a"]"#, r#""rejected""#]);
    assert_eq!(on, ["null", r#"["a"]"#, r#""rejected""#]);
}

#[test]
fn client___timestamp___converts_in_both_directions() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
StubXHR.handler = (req) => req.respond(200, { result: '2024-01-02T03:04:05.000Z' })
const r = await client.When(new Date(Date.UTC(2020, 0, 1)))
show(JSON.parse(StubXHR.sent[0].body))
show([r instanceof Date, r.toISOString()])
show(await settle(client.When('2020-01-01T00:00:00Z')))
show(await settle(client.When(new Date('nope'))))
StubXHR.handler = (req) => req.respond(200, { result: 'not a time' })
show(await settle(client.When(new Date(0))))
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#"{"params":["2020-01-01T00:00:00.000Z"]}"#,
            r#"[true,"2024-01-02T03:04:05.000Z"]"#,
            r#"{"err":"sherpa:badParams"}"#,
            r#"{"err":"sherpa:badParams"}"#,
            r#"{"err":"sherpa:badReturn"}"#,
        ]
    );
}

#[test]
fn client___multiple_returns___length_must_match() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
const replies = [['a'], ['a', 1, 2], 'a', ['a', '1'], ['a', 1]]
StubXHR.handler = (req) => req.respond(200, { result: replies[StubXHR.sent.length - 1] })
for (let i = 0; i < replies.length; i++) {
	show(await settle(client.Pair()))
}
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#"{"err":"sherpa:badReturn"}"#,
            r#"{"err":"sherpa:badReturn"}"#,
            r#"{"err":"sherpa:badReturn"}"#,
            r#"{"err":"sherpa:badReturn"}"#,
            r#"{"ok":["a",1]}"#,
        ]
    );
}

#[test]
fn client___skip_checks___passes_values_through() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
StubXHR.handler = (req) => req.respond(200, { result: 'not a number' })
show(await settle(client.withOptions({ skipParamCheck: true, skipReturnCheck: true }).Count('3')))
show(JSON.parse(StubXHR.sent[0].body))
"#,
    ) else {
        return;
    };

    assert_eq!(lines, [r#"{"ok":"not a number"}"#, r#"{"params":["3"]}"#]);
}

// ============================================================================
// Transport
// ============================================================================

#[test]
fn client___transport_failures___map_to_error_codes() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
const cases = [
	(req) => req.respond(404, ''),
	(req) => req.respond(500, 'boom'),
	(req) => req.respond(200, 'not json'),
	(req) => req.respond(200, {}),
	(req) => req.respond(200, { error: { code: 'user:denied', message: 'no' } }),
	(req) => req.onerror(),
	(req) => req.ontimeout(),
]
for (const c of cases) {
	StubXHR.handler = c
	show(await settle(client.Pair()))
}
StubXHR.handler = null
show(await settle(client.Raw(10n)))
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#"{"err":"sherpa:badFunction"}"#,
            r#"{"err":"sherpa:http"}"#,
            r#"{"err":"sherpa:badResponse"}"#,
            r#"{"err":"sherpa:badResponse"}"#,
            r#"{"err":"user:denied"}"#,
            r#"{"err":"sherpa:connection"}"#,
            r#"{"err":"sherpa:timeout"}"#,
            r#"{"err":"sherpa:badData"}"#,
        ]
    );
}

#[test]
fn client___abort___settles_once() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
const aborter = {}
const p = settle(client.withOptions({ aborter }).Pair())
show(typeof aborter.abort)
aborter.abort()
show(await p)
show(typeof aborter.abort)
show(StubXHR.sent[0].aborted)
StubXHR.sent[0].respond(200, { result: ['late', 1] })
show(await p)
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#""function""#,
            r#"{"err":"sherpa:aborted"}"#,
            r#""undefined""#,
            "true",
            r#"{"err":"sherpa:aborted"}"#,
        ]
    );
}

#[test]
fn client___shared_aborter___settled_call_keeps_other_calls_abortable() {
    let Some(lines) = run_client(
        &GenerateOptions::default(),
        r#"
const aborter = {}
const shared = client.withOptions({ aborter })
const first = settle(shared.Pair())
const second = settle(shared.Pair())
StubXHR.sent[0].respond(200, { result: ['a', 1] })
show(await first)
show(typeof aborter.abort)
aborter.abort()
show(await second)
show(StubXHR.sent[1].aborted)
"#,
    ) else {
        return;
    };

    assert_eq!(
        lines,
        [
            r#"{"ok":["a",1]}"#,
            r#""function""#,
            r#"{"err":"sherpa:aborted"}"#,
            "true",
        ]
    );
}
