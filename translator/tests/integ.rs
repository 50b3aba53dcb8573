extern crate smali2java;

use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::path::Path;

use smali2java::error::MalformedReason;
use smali2java::session::{translate_reader, translate_source};
use smali2java::{LeniencyLevel, Options};

#[test]
fn hello_world() {
    test(
        include_str!("inputs/hello_world.smali"),
        Options::default(),
        &[
            "public class HelloWorld {",
            "// .source \"HelloWorld.java\"",
            "// # direct methods",
            "public   HelloWorld (  ) {",
            "// .registers 1",
            "// invoke-direct {p0}, Ljava/lang/Object;-><init>()V",
            "return;",
            "}",
            "public static void main (  ) {",
            "// .registers 2",
            "// sget-object v0, Ljava/lang/System;->out:Ljava/io/PrintStream;",
            "final String v1 = \"Hello, World!\" ;",
            "// invoke-virtual {v0, v1}, Ljava/io/PrintStream;->println(Ljava/lang/String;)V",
            "return;",
            "}",
        ]
    );
}

#[test]
fn hello_world_with_static_reads() {
    let options = Options { leniency: LeniencyLevel::Strict, static_field_reads: true };
    let unit = translate_source(include_str!("inputs/hello_world.smali"), &options).unwrap();
    let rendered = unit.to_string();
    let line = rendered.lines().nth(10).unwrap();
    assert_eq!(line, "v0 = java.lang.System . out ;");
}

#[test]
fn activity() {
    let expected = [
        "public final class MainActivity extends Activity",
        "private static final java.lang.String TAG = \"Main  Activity\" ;",
        "public  Integer count ;",
        "protected  Boolean[] flags ;",
        "public static com.checker.HttpRequest request (  ) {",
        "// .registers 2",
        "com.checker.HttpRequest . post ( p0 );",
        "// move-result-object v0",
        "return  v0;",
        "}",
        "public  final synchronized Long count (  ) {",
        "// .registers 3",
        "java.lang.Math . max ( v0, v1 );",
        "return;",
        "}",
    ];
    test(include_str!("inputs/activity.smali"), Options::default(), &expected);
    test(
        include_str!("inputs/activity.smali"),
        Options { leniency: LeniencyLevel::Strict, ..Options::default() },
        &expected,
    );
}

#[test]
fn malformed_file_reports_line() {
    let error = translate_reader(
        Cursor::new(include_str!("inputs/malformed.smali")),
        Path::new("inputs/malformed.smali"),
        &Options::default(),
    ).unwrap_err();

    let malformed = error.malformed().unwrap();
    assert_eq!(malformed.line_number, 6);
    assert_eq!(malformed.mnemonic, ".field");
    assert_eq!(
        malformed.reason,
        MalformedReason::MissingDelimiter { token: "missingType".to_string(), delimiter: ":" }
    );

    let snippet = malformed.render_snippet(Some("inputs/malformed.smali"), false);
    assert!(snippet.contains("inputs/malformed.smali"));
    assert!(snippet.contains(".field public missingType"));
}

#[test]
fn reader_and_source_agree() {
    let source = include_str!("inputs/activity.smali");
    let from_reader = translate_reader(Cursor::new(source), Path::new("activity.smali"), &Options::default()).unwrap();
    let from_source = translate_source(source, &Options::default()).unwrap();
    assert_eq!(from_reader, from_source);
}

#[test]
fn single_lines() {
    single_line_tests(&[
        ("return-void", "return;"),
        ("return-object v1,", "return  v1;"),
        ("const-string v0, \"x\"", "final String v0 = \"x\" ;"),
        ("foo bar baz", "// foo bar baz"),
        ("invoke-static/range {v0 .. v1}, La/B;->c(II)V", "// invoke-static/range {v0 .. v1}, La/B;->c(II)V"),
        ("const-string/jumbo v0, \"x\"", "// const-string/jumbo v0, \"x\""),
        (".end method", "}"),
        (".field public static x:D", "public static Double x ;"),
        (".method private f()F", "private  Float f (  ) {"),
    ]);
}

fn test(input: &str, options: Options, expected: &[&str]) {
    let unit = translate_source(input, &options).unwrap();
    let expected = expected.iter().map(|line| format!("{}\n", line)).collect::<String>();
    assert_eq!(unit.to_string(), expected);
}

fn single_line_tests(tests: &[(&str, &str)]) {
    for (input, expected) in tests {
        test(input, Options::default(), &[*expected]);
    }
}
