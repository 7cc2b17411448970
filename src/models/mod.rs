//! # Data Models
//!
//! Typed payloads for the CoBoard backend contract. Field names follow the
//! wire format exactly; everything here is plain serde data with a few
//! convenience methods that bridge into the pure decision logic in
//! [`crate::forum`].
//!
//! One wire quirk is resolved here rather than carried: the backend uses
//! `access` both as the 0/1 mode flag on forum create/update payloads and as
//! the list of access records on page responses. These are two different
//! types in this module: [`AccessMode`] for the flag, [`AccessRecord`] for
//! the list elements.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::forum::access::{resolve_access, AccessDecision, Requester, Role};
use crate::forum::schedule::TopicWindow;

/// Forum access mode. On the wire this is an integer: `1` = Public,
/// `0` = Private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    Public,
    Private,
}

impl AccessMode {
    pub fn as_wire(&self) -> u8 {
        match self {
            AccessMode::Public => 1,
            AccessMode::Private => 0,
        }
    }
}

impl Serialize for AccessMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for AccessMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(AccessMode::Public),
            0 => Ok(AccessMode::Private),
            other => Err(serde::de::Error::custom(format!(
                "invalid access mode {}, expected 0 or 1",
                other
            ))),
        }
    }
}

/// One access entry attached to a forum: `user_id` holds the entry string
/// (cohort prefix or exact member id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub forum_id: i64,
    pub user_id: String,
}

/// Entry strings scoped to one forum, borrowed from a page's access records.
pub fn entries_for_forum(records: &[AccessRecord], forum_id: i64) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.forum_id == forum_id)
        .map(|r| r.user_id.as_str())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i64,
    pub tag_text: String,
    pub board: String,
    #[serde(rename = "use", default)]
    pub use_count: i64,
}

/// Forum-to-tag link row from the board page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTagLink {
    pub forum_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forum {
    pub forum_id: i64,
    pub forum_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator_id: String,
    #[serde(default)]
    pub created_time: Option<NaiveDate>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub wallpaper: Option<String>,
    #[serde(default)]
    pub font: Option<i64>,
    #[serde(default)]
    pub sort_by: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
    pub board: String,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
}

impl Forum {
    /// URL slug for this forum, falling back to deriving it from the name
    /// when the backend did not populate the column.
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) => slug.clone(),
            None => crate::forum::slugify(&self.forum_name),
        }
    }

    /// Whether this forum orders its topics by like count (`sort_by == 1`).
    pub fn sorts_topics_by_likes(&self) -> bool {
        self.sort_by == Some(1)
    }
}

/// Forum row on the board page, annotated with its contributor count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumWithContributors {
    #[serde(flatten)]
    pub forum: Forum,
    #[serde(default)]
    pub total_contributors: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: i64,
    pub text: String,
    #[serde(default)]
    pub publish: Option<NaiveDate>,
    #[serde(default)]
    pub expired: Option<NaiveDate>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Topic {
    /// The topic's schedule window for visibility/interactivity checks.
    pub fn window(&self) -> TopicWindow {
        TopicWindow::new(self.publish, self.expired)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub post_id: i64,
    pub post_head: String,
    #[serde(default)]
    pub post_body: Option<String>,
    #[serde(default)]
    pub heart: Option<i64>,
    #[serde(default)]
    pub spost_creator: Option<String>,
    #[serde(default)]
    pub apost_creator: Option<String>,
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Post {
    /// Display name of whichever user class created the post.
    pub fn creator(&self) -> Option<&str> {
        self.spost_creator.as_deref().or(self.apost_creator.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub comment_text: String,
    #[serde(default)]
    pub comment_heart: Option<i64>,
    #[serde(default)]
    pub scomment_creator: Option<String>,
    #[serde(default)]
    pub acomment_creator: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub file_id: i64,
    pub filename: String,
    pub path: String,
    pub extension: String,
    #[serde(default)]
    pub s_owner: Option<String>,
    #[serde(default)]
    pub a_owner: Option<String>,
    #[serde(default)]
    pub post_id: Option<i64>,
}

/// Bookmark row. SE and anonymous bookmarks share the same shape; which
/// table a row came from is determined by the request's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub forum_id: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeUser {
    pub sid: String,
    pub spw: String,
    #[serde(default)]
    pub sprofile: Option<String>,
    #[serde(default)]
    pub sfile: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymousUser {
    pub aid: String,
    pub apw: String,
    #[serde(default)]
    pub aprofile: Option<String>,
    pub mail: String,
}

/// `GET /coboard/{board}/` response: the board page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardPage {
    pub forums: Vec<ForumWithContributors>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub forumtag: Option<Vec<ForumTagLink>>,
    #[serde(default)]
    pub access: Option<Vec<AccessRecord>>,
}

impl BoardPage {
    /// Resolve access for one of this page's forums.
    ///
    /// The page carries access records for every forum on the board; only the
    /// records scoped to `forum` participate in the decision.
    pub fn resolve_forum_access(
        &self,
        forum: &ForumWithContributors,
        requester: &Requester,
    ) -> AccessDecision {
        let records = self.access.as_deref().unwrap_or(&[]);
        let entries = entries_for_forum(records, forum.forum.forum_id);
        resolve_access(&forum.forum.creator_id, &entries, requester)
    }
}

/// `GET /coboard/{board}/{forum}/` response: the forum page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPage {
    #[serde(flatten)]
    pub forum: Forum,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub btags: Vec<Tag>,
    #[serde(default)]
    pub sbookmarks: Option<Vec<Bookmark>>,
    #[serde(default)]
    pub abookmarks: Option<Vec<Bookmark>>,
    #[serde(default)]
    pub access: Option<Vec<AccessRecord>>,
}

impl ForumPage {
    /// Resolve access for this forum. The page's access records are already
    /// scoped to it.
    pub fn resolve_access(&self, requester: &Requester) -> AccessDecision {
        let records = self.access.as_deref().unwrap_or(&[]);
        let entries: Vec<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
        resolve_access(&self.forum.creator_id, &entries, requester)
    }

    /// Find the topic that owns `post_id`, for gating likes and comments on
    /// the topic's schedule.
    pub fn topic_of_post(&self, post_id: i64) -> Option<&Topic> {
        self.topics
            .iter()
            .find(|t| t.posts.iter().any(|p| p.post_id == post_id))
    }

    /// Find the topic that owns `comment_id`, through its posts.
    pub fn topic_of_comment(&self, comment_id: i64) -> Option<&Topic> {
        self.topics.iter().find(|t| {
            t.posts
                .iter()
                .any(|p| p.comments.iter().any(|c| c.comment_id == comment_id))
        })
    }
}

/// Forum create/update payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewForum {
    pub forum_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallpaper: Option<String>,
    pub access: AccessMode,
    pub font: i64,
    pub sort_by: i64,
    pub creator_id: String,
    pub board: String,
    pub tags: Vec<Tag>,
}

/// Topic create payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewTopic {
    pub text: String,
    pub publish: Option<NaiveDate>,
    pub expired: Option<NaiveDate>,
}

/// Post create payload. Exactly one of the creator fields is set, matching
/// the requester's user class.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub post_head: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_body: Option<String>,
    pub heart: i64,
    pub spost_creator: Option<String>,
    pub apost_creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
}

impl NewPost {
    pub fn by(requester: &Requester, head: impl Into<String>) -> Self {
        let (s, a) = creator_pair(requester);
        NewPost {
            post_head: head.into(),
            post_body: None,
            heart: 0,
            spost_creator: s,
            apost_creator: a,
            pic: None,
        }
    }
}

/// Comment create payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub comment_text: String,
    pub scomment_creator: Option<String>,
    pub acomment_creator: Option<String>,
}

impl NewComment {
    pub fn by(requester: &Requester, text: impl Into<String>) -> Self {
        let (s, a) = creator_pair(requester);
        NewComment {
            comment_text: text.into(),
            scomment_creator: s,
            acomment_creator: a,
        }
    }
}

/// Split a requester into the `(s*, a*)` creator column pair used by post and
/// comment payloads.
fn creator_pair(requester: &Requester) -> (Option<String>, Option<String>) {
    match requester.role {
        Role::Se => (Some(requester.id.clone()), None),
        Role::Anonymous => (None, Some(requester.id.clone())),
    }
}

/// Target of a like update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    Post,
    Comment,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeUpdate {
    pub item_id: i64,
    pub item_type: LikeTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LikeResponse {
    pub item_id: i64,
    pub item_type: LikeTarget,
    pub likes: i64,
}

/// Bookmark add payload: identity plus the role tag picking the user class.
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkRequest {
    pub user_id: String,
    pub status: Role,
}

/// `GET /` response: every registered user, both classes.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDirectory {
    pub se: Vec<SeUser>,
    pub anonymous: Vec<AnonymousUser>,
}

/// `GET /user/{id}` response; the shape depends on the user class.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProfilePage {
    Se(SeProfile),
    Anonymous(AnonymousProfile),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeProfile {
    pub sid: String,
    pub spw: String,
    #[serde(default)]
    pub sprofile: Option<String>,
    #[serde(default)]
    pub sfile: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bookmarked: Option<Vec<Forum>>,
    #[serde(default)]
    pub created: Option<Vec<Forum>>,
    #[serde(default)]
    pub files: Option<Vec<FileEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnonymousProfile {
    pub aid: String,
    pub apw: String,
    #[serde(default)]
    pub aprofile: Option<String>,
    pub mail: String,
    #[serde(default)]
    pub bookmarked: Option<Vec<Forum>>,
    #[serde(default)]
    pub files: Option<Vec<FileEntry>>,
}

/// Profile update payload. Field names are the backend's, verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "studentId")]
    pub student_id: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "profileImage")]
    pub profile_image: String,
}

/// Anonymous signup payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewAnonymousUser {
    pub aid: String,
    pub apw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aprofile: Option<String>,
    pub mail: String,
}

/// Password-reset mail trigger payload.
#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub receiver_email: String,
    pub pw: String,
}

/// `POST /file` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub file_path: String,
}
