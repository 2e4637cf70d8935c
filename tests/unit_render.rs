// Unit tests for digest rendering.
//
// Name joining, line-break conversion, quote marking and placeholder
// substitution. All pure string work.

use chrono::Utc;
use threadmail::inputs::Templates;
use threadmail::output::render::{
    distinct_authors, html_line_breaks, join_names, render_digest, render_post,
};
use threadmail::post::Post;

fn post(id: u64, author: &str, text: &str) -> Post {
    Post {
        id,
        author: author.to_string(),
        created_at: Utc::now(),
        engagement: 1,
        in_reply_to_user: None,
        in_reply_to_post: None,
        text: text.to_string(),
        quoted_post: None,
    }
}

fn templates() -> Templates {
    Templates {
        email: "<h1>From {{names}}</h1><div>{{tweets}}</div>".to_string(),
        post: "<p><a href=\"{{url}}\">{{name}}</a>: {{tweet}}</p>".to_string(),
    }
}

// ============================================================
// Name joining
// ============================================================

#[test]
fn join_single_name() {
    assert_eq!(join_names(&["a"]), "a");
}

#[test]
fn join_two_names() {
    assert_eq!(join_names(&["a", "b"]), "a and b");
}

#[test]
fn join_three_or_more_names_uses_oxford_comma() {
    assert_eq!(join_names(&["a", "b", "c"]), "a, b, and c");
    assert_eq!(join_names(&["a", "b", "c", "d"]), "a, b, c, and d");
}

#[test]
fn join_no_names() {
    assert_eq!(join_names(&[]), "");
}

#[test]
fn distinct_authors_in_first_appearance_order() {
    let posts = vec![
        post(1, "zed", ""),
        post(2, "amy", ""),
        post(3, "zed", ""),
        post(4, "bo", ""),
    ];
    assert_eq!(distinct_authors(&posts), vec!["zed", "amy", "bo"]);
}

// ============================================================
// Post fragments
// ============================================================

#[test]
fn line_breaks_become_br() {
    assert_eq!(html_line_breaks("one\ntwo\r\nthree"), "one<br>two<br>three");
    assert_eq!(html_line_breaks("flat"), "flat");
}

#[test]
fn post_fragment_substitutes_all_placeholders() {
    let p = post(42, "rustlang", "Rust 2.0?\nNo.");
    assert_eq!(
        render_post(&p, &templates().post),
        "<p><a href=\"https://twitter.com/rustlang/status/42\">rustlang</a>: Rust 2.0?<br>No.</p>"
    );
}

#[test]
fn quote_posts_are_marked() {
    let mut p = post(7, "tokio_rs", "look at this");
    p.quoted_post = Some(6);
    let fragment = render_post(&p, "{{name}}|{{url}}");
    assert_eq!(fragment, "tokio_rs (reply)|https://twitter.com/tokio_rs/status/7");
}

#[test]
fn placeholder_text_inside_a_post_is_left_alone() {
    let p = post(1, "a", "literally {{name}} and {{names}}");
    let html = render_digest(&[p], &templates());
    assert!(html.contains("literally {{name}} and {{names}}"));
    assert!(html.starts_with("<h1>From a</h1>"));
}

// ============================================================
// Whole digest
// ============================================================

#[test]
fn digest_concatenates_fragments_in_order() {
    let posts = vec![post(1, "a", "first"), post(2, "b", "second"), post(3, "a", "third")];
    let html = render_digest(&posts, &templates());

    assert!(html.starts_with("<h1>From a and b</h1>"));
    let first = html.find("first").unwrap();
    let second = html.find("second").unwrap();
    let third = html.find("third").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn empty_digest_is_still_well_formed() {
    let html = render_digest(&[], &templates());
    assert_eq!(html, "<h1>From </h1><div></div>");
}
