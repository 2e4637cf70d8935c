// Reply filter: drop posts that reply to a user or to another post.

use crate::post::Post;

/// Keep only posts with neither reply indicator set. Order is preserved.
pub fn drop_replies(posts: Vec<Post>) -> Vec<Post> {
    posts.into_iter().filter(|post| !post.is_reply()).collect()
}
