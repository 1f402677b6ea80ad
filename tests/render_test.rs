// SPDX-License-Identifier: MIT

use diff_blocks::*;

use lines::split_lines;
use matcher::SequenceMatcher;
use termcolor::NoColor;

fn render_plain(base_text: &str, target_text: &str, context: usize) -> String {
    let base = split_lines(base_text);
    let target = split_lines(target_text);
    let mut matcher = SequenceMatcher::new(&base, &target);
    let groups = matcher.grouped_opcodes(context);

    let mut out = NoColor::new(Vec::new());
    render::write_groups(&mut out, &base, &target, &groups).unwrap();
    String::from_utf8(out.into_inner()).unwrap()
}

#[test]
fn renders_a_single_hunk() {
    let base = "one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine";
    let target = "one\ntwo\nthree\nfour\nFIVE\nsix\nseven\neight\nnine";

    assert_eq!(
        render_plain(base, target, 1),
        "@@ -4,3 +4,3 @@\n four\n-five\n+FIVE\n six\n"
    );
}

#[test]
fn renders_inserts_and_deletes() {
    let base = "keep\ndrop\nkeep";
    let target = "keep\nkeep\nadded";

    assert_eq!(
        render_plain(base, target, 3),
        "@@ -1,3 +1,3 @@\n keep\n-drop\n keep\n+added\n"
    );
}

#[test]
fn renders_nothing_for_identical_inputs() {
    assert_eq!(render_plain("a\nb\nc", "a\nb\nc", 3), "");
}

#[test]
fn renders_multiple_hunks() {
    let base: String = (0..30)
        .map(|i| format!("line {}\n", i))
        .collect();
    let target = base.replace("line 3\n", "LINE 3\n").replace("line 25\n", "LINE 25\n");

    let rendered = render_plain(&base, &target, 2);
    let headers: Vec<&str> = rendered
        .lines()
        .filter(|line| line.starts_with("@@"))
        .collect();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0], "@@ -2,5 +2,5 @@");
}

#[test]
fn renders_insert_into_empty_base() {
    assert_eq!(render_plain("", "a", 3), "@@ -1 +1 @@\n-\n+a\n");
}
