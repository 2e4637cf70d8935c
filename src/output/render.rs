// Digest rendering: fill the HTML templates with the selected posts.
//
// Substitution is plain placeholder replacement. Post bodies are inserted
// last so text inside a post can never be mistaken for a placeholder.

use crate::inputs::Templates;
use crate::post::Post;

pub const NAME_PLACEHOLDER: &str = "{{name}}";
pub const URL_PLACEHOLDER: &str = "{{url}}";
pub const BODY_PLACEHOLDER: &str = "{{tweet}}";
pub const NAMES_PLACEHOLDER: &str = "{{names}}";
pub const POSTS_PLACEHOLDER: &str = "{{tweets}}";

/// Suffix shown after the author of a quote post.
pub const QUOTE_MARKER: &str = " (reply)";

/// Join names as English prose: `a`, `a and b`, `a, b, and c`.
pub fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

/// Distinct authors in order of first appearance.
pub fn distinct_authors(posts: &[Post]) -> Vec<&str> {
    let mut authors: Vec<&str> = Vec::new();
    for post in posts {
        if !authors.contains(&post.author.as_str()) {
            authors.push(&post.author);
        }
    }
    authors
}

/// Turn line breaks into HTML `<br>` tags.
pub fn html_line_breaks(text: &str) -> String {
    text.replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Author label for a post; quote posts are marked.
pub fn display_name(post: &Post) -> String {
    if post.is_quote() {
        format!("{}{}", post.author, QUOTE_MARKER)
    } else {
        post.author.clone()
    }
}

/// Fill the per-post template for one post.
pub fn render_post(post: &Post, template: &str) -> String {
    template
        .replace(NAME_PLACEHOLDER, &display_name(post))
        .replace(URL_PLACEHOLDER, &post.permalink())
        .replace(BODY_PLACEHOLDER, &html_line_breaks(&post.text))
}

/// Render the whole email body.
///
/// An empty digest still produces the outer template, with an empty names
/// line and an empty post section.
pub fn render_digest(posts: &[Post], templates: &Templates) -> String {
    let fragments: String = posts
        .iter()
        .map(|post| render_post(post, &templates.post))
        .collect();

    templates
        .email
        .replace(NAMES_PLACEHOLDER, &join_names(&distinct_authors(posts)))
        .replace(POSTS_PLACEHOLDER, &fragments)
}
