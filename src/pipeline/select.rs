// Round-robin selection: pick the most-liked posts without letting one
// prolific account take over the digest.
//
// Each round takes at most one post per author: the best remaining post of
// every author, in order of those posts' engagement. Rounds repeat until the
// target count is reached or every author is exhausted.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::post::Post;

/// Group posts by author, groups in order of each author's first appearance.
pub fn group_by_author(posts: Vec<Post>) -> Vec<Vec<Post>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Post>> = Vec::new();

    for post in posts {
        match index.get(&post.author) {
            Some(&i) => groups[i].push(post),
            None => {
                index.insert(post.author.clone(), groups.len());
                groups.push(vec![post]);
            }
        }
    }

    groups
}

/// Select up to `target` posts, one per author per round.
///
/// Returns exactly `target` posts unless fewer are available, in which case
/// all of them are returned. Deterministic: ties between groups keep their
/// previous order (stable sort by descending best score), and ties inside a
/// group go to the latest arrival.
pub fn select_posts(posts: Vec<Post>, target: usize) -> Vec<Post> {
    if target == 0 {
        return Vec::new();
    }

    let mut groups = group_by_author(posts);
    // Ascending, so the best post of each group is at the end and can be popped.
    for group in &mut groups {
        group.sort_by_key(|post| post.engagement);
    }

    let available: usize = groups.iter().map(Vec::len).sum();
    let mut chosen = Vec::with_capacity(target.min(available));

    while !groups.is_empty() {
        groups.sort_by_key(|group| Reverse(group.last().map_or(0, |post| post.engagement)));

        for group in &mut groups {
            if let Some(post) = group.pop() {
                chosen.push(post);
            }
            if chosen.len() == target {
                return chosen;
            }
        }

        groups.retain(|group| !group.is_empty());
    }

    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(id: u64, author: &str, engagement: u64) -> Post {
        Post {
            id,
            author: author.to_string(),
            created_at: Utc::now(),
            engagement,
            in_reply_to_user: None,
            in_reply_to_post: None,
            text: String::new(),
            quoted_post: None,
        }
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_group_by_author_keeps_first_appearance_order() {
        let groups = group_by_author(vec![
            post(1, "b", 1),
            post(2, "a", 1),
            post(3, "b", 1),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec![1, 3]);
        assert_eq!(ids(&groups[1]), vec![2]);
    }

    #[test]
    fn test_zero_target_is_empty() {
        assert!(select_posts(vec![post(1, "a", 5)], 0).is_empty());
    }

    #[test]
    fn test_one_author_is_ranked_by_engagement() {
        let chosen = select_posts(
            vec![post(1, "a", 5), post(2, "a", 50), post(3, "a", 20)],
            2,
        );
        assert_eq!(ids(&chosen), vec![2, 3]);
    }

    #[test]
    fn test_equal_best_scores_keep_group_order() {
        let chosen = select_posts(
            vec![post(1, "a", 10), post(2, "b", 10), post(3, "c", 10)],
            3,
        );
        assert_eq!(ids(&chosen), vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_scores_within_group_take_latest_arrival_first() {
        let chosen = select_posts(vec![post(1, "a", 10), post(2, "a", 10)], 1);
        assert_eq!(ids(&chosen), vec![2]);
    }
}
