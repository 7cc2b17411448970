//! Listing filters and sort orders for board and forum pages.
//!
//! These mirror the view-side rules: forum search is a case-insensitive
//! starts-with on the name, topic search is a case-insensitive substring on
//! the text, and both sorts are stable so ties keep their fetched order.

use chrono::NaiveDate;

use crate::models::{ForumTagLink, ForumWithContributors, Topic};

/// Sort order for forum listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForumSort {
    /// Newest forums first (descending forum id).
    Latest,
    /// Most contributors first.
    MostPopular,
}

impl std::str::FromStr for ForumSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(ForumSort::Latest),
            "popular" => Ok(ForumSort::MostPopular),
            other => Err(format!("unknown sort '{}', expected \"latest\" or \"popular\"", other)),
        }
    }
}

/// Filter and order a board page's forum list.
///
/// `search` keeps forums whose name starts with the term (case-insensitive).
/// `tag_ids` keeps forums linked to at least one of the given tags through
/// `links`; an empty list keeps everything.
pub fn filter_forums<'a>(
    forums: &'a [ForumWithContributors],
    search: Option<&str>,
    tag_ids: &[i64],
    links: &[ForumTagLink],
    sort: Option<ForumSort>,
) -> Vec<&'a ForumWithContributors> {
    let mut result: Vec<&ForumWithContributors> = forums.iter().collect();

    if let Some(term) = search {
        let term = term.to_lowercase();
        result.retain(|f| f.forum.forum_name.to_lowercase().starts_with(&term));
    }

    if !tag_ids.is_empty() {
        result.retain(|f| {
            links
                .iter()
                .any(|l| l.forum_id == f.forum.forum_id && tag_ids.contains(&l.tag_id))
        });
    }

    match sort {
        Some(ForumSort::Latest) => result.sort_by(|a, b| b.forum.forum_id.cmp(&a.forum.forum_id)),
        Some(ForumSort::MostPopular) => {
            result.sort_by(|a, b| b.total_contributors.cmp(&a.total_contributors))
        }
        None => {}
    }

    result
}

/// Filter a forum page's topic list by a case-insensitive substring search,
/// optionally ordering by like count (total post hearts, descending).
pub fn filter_topics<'a>(
    topics: &'a [Topic],
    search: Option<&str>,
    by_likes: bool,
) -> Vec<&'a Topic> {
    let mut result: Vec<&Topic> = topics.iter().collect();

    if let Some(term) = search {
        let term = term.to_lowercase();
        result.retain(|t| t.text.to_lowercase().contains(&term));
    }

    if by_likes {
        result.sort_by(|a, b| total_hearts(b).cmp(&total_hearts(a)));
    }

    result
}

/// Topics whose publish date has been reached on `today`.
pub fn visible_topics<'a>(topics: &'a [Topic], today: NaiveDate) -> Vec<&'a Topic> {
    topics.iter().filter(|t| t.window().is_visible(today)).collect()
}

fn total_hearts(topic: &Topic) -> i64 {
    topic.posts.iter().map(|p| p.heart.unwrap_or(0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Forum, Post};

    fn forum(id: i64, name: &str, contributors: i64) -> ForumWithContributors {
        ForumWithContributors {
            forum: Forum {
                forum_id: id,
                forum_name: name.to_string(),
                description: None,
                creator_id: "66012345".to_string(),
                created_time: None,
                icon: None,
                wallpaper: None,
                font: None,
                sort_by: None,
                slug: Some(crate::forum::slugify(name)),
                board: "cpe".to_string(),
                last_updated: None,
            },
            total_contributors: contributors,
        }
    }

    fn topic(id: i64, text: &str, hearts: &[i64]) -> Topic {
        Topic {
            topic_id: id,
            text: text.to_string(),
            publish: None,
            expired: None,
            posts: hearts
                .iter()
                .map(|h| Post {
                    post_id: 0,
                    post_head: String::new(),
                    post_body: None,
                    heart: Some(*h),
                    spost_creator: None,
                    apost_creator: None,
                    pic: None,
                    comments: vec![],
                    files: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn search_is_starts_with_case_insensitive() {
        let forums = vec![forum(1, "Exam Review", 4), forum(2, "Homework", 9)];
        let hits = filter_forums(&forums, Some("exam"), &[], &[], None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].forum.forum_name, "Exam Review");

        // Substring matches in the middle do not count.
        assert!(filter_forums(&forums, Some("review"), &[], &[], None).is_empty());
    }

    #[test]
    fn tag_filter_keeps_linked_forums() {
        let forums = vec![forum(1, "A", 0), forum(2, "B", 0)];
        let links = vec![
            ForumTagLink { forum_id: 1, tag_id: 7 },
            ForumTagLink { forum_id: 2, tag_id: 8 },
        ];
        let hits = filter_forums(&forums, None, &[7], &links, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].forum.forum_id, 1);
    }

    #[test]
    fn latest_sorts_by_descending_forum_id() {
        let forums = vec![forum(1, "A", 0), forum(3, "C", 0), forum(2, "B", 0)];
        let sorted = filter_forums(&forums, None, &[], &[], Some(ForumSort::Latest));
        let ids: Vec<i64> = sorted.iter().map(|f| f.forum.forum_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn popular_sorts_by_contributors_and_keeps_ties_stable() {
        let forums = vec![forum(1, "A", 2), forum(2, "B", 5), forum(3, "C", 2)];
        let sorted = filter_forums(&forums, None, &[], &[], Some(ForumSort::MostPopular));
        let ids: Vec<i64> = sorted.iter().map(|f| f.forum.forum_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn topic_search_matches_substring() {
        let topics = vec![topic(1, "Midterm questions", &[]), topic(2, "Lab 3", &[])];
        let hits = filter_topics(&topics, Some("term"), false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic_id, 1);
    }

    #[test]
    fn topic_like_sort_uses_total_post_hearts() {
        let topics = vec![topic(1, "A", &[1, 2]), topic(2, "B", &[10]), topic(3, "C", &[])];
        let sorted = filter_topics(&topics, None, true);
        let ids: Vec<i64> = sorted.iter().map(|t| t.topic_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
