//! # Backend API Client
//!
//! HTTP client for the CoBoard backend. The endpoint contract is fixed
//! externally; this module maps it onto typed requests and responses from
//! [`crate::models`].
//!
//! Failure policy: requests are not retried, not deduplicated, and not
//! cancelled on navigation. Errors carry the endpoint name and are surfaced
//! to the caller, whose state stays untouched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::debug;
use tokio::time::timeout;

use crate::config::ApiConfig;
use crate::forum::access::{Requester, Role};
use crate::models::{
    AccessRecord, AnonymousUser, BoardPage, Bookmark, BookmarkRequest, Comment, EmailRequest,
    Forum, ForumPage, LikeResponse, LikeUpdate, NewAnonymousUser, NewComment, NewForum, NewPost,
    NewTopic, Post, ProfilePage, ProfileUpdate, Topic, UploadReceipt, UserDirectory,
};

/// Client for the CoBoard REST backend.
pub struct CoboardClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl CoboardClient {
    pub fn new(config: ApiConfig) -> Self {
        CoboardClient {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn board_path(&self, board: &str) -> String {
        format!("/coboard/{}", urlencoding::encode(board))
    }

    fn forum_path(&self, board: &str, forum_slug: &str) -> String {
        format!(
            "/coboard/{}/{}",
            urlencoding::encode(board),
            urlencoding::encode(forum_slug)
        )
    }

    /// Send a request with the configured timeout and check the status code.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        what: &'static str,
    ) -> Result<reqwest::Response> {
        let limit = Duration::from_secs(self.config.timeout_seconds as u64);
        let response = timeout(limit, request.send())
            .await
            .map_err(|_| anyhow!("{}: request timeout after {}s", what, self.config.timeout_seconds))?
            .map_err(|e| anyhow!("{}: HTTP request failed: {}", what, e))?;

        if !response.status().is_success() {
            return Err(anyhow!("{}: server returned status {}", what, response.status()));
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &'static str,
    ) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| anyhow!("{}: failed to parse response: {}", what, e))
    }

    /// `GET /coboard/{board}/` - the board page with forums, tags, tag links
    /// and access records.
    pub async fn fetch_board(&self, board: &str) -> Result<BoardPage> {
        let url = self.url(&format!("{}/", self.board_path(board)));
        debug!("Fetching board page: {}", url);
        let response = self.execute(self.client.get(&url), "fetch board").await?;
        Self::decode(response, "fetch board").await
    }

    /// `GET /coboard/{board}/{forum}/` - the forum page with topics, posts,
    /// bookmarks and access records.
    pub async fn fetch_forum(&self, board: &str, forum_slug: &str) -> Result<ForumPage> {
        let url = self.url(&format!("{}/", self.forum_path(board, forum_slug)));
        debug!("Fetching forum page: {}", url);
        let response = self.execute(self.client.get(&url), "fetch forum").await?;
        Self::decode(response, "fetch forum").await
    }

    /// `POST /coboard/{board}/` - create a forum.
    pub async fn create_forum(&self, board: &str, forum: &NewForum) -> Result<Forum> {
        let url = self.url(&format!("{}/", self.board_path(board)));
        let response = self
            .execute(self.client.post(&url).json(forum), "create forum")
            .await?;
        Self::decode(response, "create forum").await
    }

    /// `PUT /coboard/{board}/{forum}/setting` - update forum settings.
    pub async fn update_forum(
        &self,
        board: &str,
        forum_slug: &str,
        forum: &NewForum,
    ) -> Result<ForumPage> {
        let url = self.url(&format!("{}/setting", self.forum_path(board, forum_slug)));
        let response = self
            .execute(self.client.put(&url).json(forum), "update forum")
            .await?;
        Self::decode(response, "update forum").await
    }

    /// `DELETE /user/{sid}/{forum_id}` - delete a forum the user created.
    pub async fn delete_forum(&self, sid: &str, forum_id: i64) -> Result<()> {
        let url = self.url(&format!("/user/{}/{}", urlencoding::encode(sid), forum_id));
        self.execute(self.client.delete(&url), "delete forum").await?;
        Ok(())
    }

    /// `POST /coboard/{board}/{forum}/setting?user_id=` - add one access
    /// entry to a forum.
    pub async fn create_access(
        &self,
        board: &str,
        forum_slug: &str,
        user_id: &str,
    ) -> Result<AccessRecord> {
        let url = self.url(&format!("{}/setting", self.forum_path(board, forum_slug)));
        let response = self
            .execute(
                self.client.post(&url).query(&[("user_id", user_id)]),
                "create access",
            )
            .await?;
        Self::decode(response, "create access").await
    }

    /// `DELETE /coboard/{board}/{forum}/setting` - clear every access entry
    /// on a forum.
    pub async fn clear_access(&self, board: &str, forum_slug: &str) -> Result<()> {
        let url = self.url(&format!("{}/setting", self.forum_path(board, forum_slug)));
        self.execute(self.client.delete(&url), "clear access").await?;
        Ok(())
    }

    /// `POST /coboard/{board}/{forum}/topic` - create a topic.
    pub async fn create_topic(
        &self,
        board: &str,
        forum_slug: &str,
        topic: &NewTopic,
    ) -> Result<Topic> {
        let url = self.url(&format!("{}/topic", self.forum_path(board, forum_slug)));
        let response = self
            .execute(self.client.post(&url).json(topic), "create topic")
            .await?;
        Self::decode(response, "create topic").await
    }

    /// `POST /coboard/{board}/{forum}/post?topic_id=` - create a post under a
    /// topic.
    pub async fn create_post(
        &self,
        board: &str,
        forum_slug: &str,
        topic_id: i64,
        post: &NewPost,
    ) -> Result<Post> {
        let url = self.url(&format!("{}/post", self.forum_path(board, forum_slug)));
        let response = self
            .execute(
                self.client
                    .post(&url)
                    .query(&[("topic_id", topic_id)])
                    .json(post),
                "create post",
            )
            .await?;
        Self::decode(response, "create post").await
    }

    /// `PUT /coboard/{board}/{forum}/like` - like a post or comment.
    pub async fn update_like(
        &self,
        board: &str,
        forum_slug: &str,
        update: &LikeUpdate,
    ) -> Result<LikeResponse> {
        let url = self.url(&format!("{}/like", self.forum_path(board, forum_slug)));
        let response = self
            .execute(self.client.put(&url).json(update), "update like")
            .await?;
        Self::decode(response, "update like").await
    }

    /// `POST /coboard/{board}/{forum}/comment?post_id=` - add a comment to a
    /// post.
    pub async fn add_comment(
        &self,
        board: &str,
        forum_slug: &str,
        post_id: i64,
        comment: &NewComment,
    ) -> Result<Comment> {
        let url = self.url(&format!("{}/comment", self.forum_path(board, forum_slug)));
        let response = self
            .execute(
                self.client
                    .post(&url)
                    .query(&[("post_id", post_id)])
                    .json(comment),
                "add comment",
            )
            .await?;
        Self::decode(response, "add comment").await
    }

    /// `POST /coboard/{board}/{forum}` - bookmark a forum for the requester.
    pub async fn add_bookmark(
        &self,
        board: &str,
        forum_slug: &str,
        requester: &Requester,
    ) -> Result<Bookmark> {
        let url = self.url(&self.forum_path(board, forum_slug));
        let body = BookmarkRequest {
            user_id: requester.id.clone(),
            status: requester.role,
        };
        let response = self
            .execute(self.client.post(&url).json(&body), "add bookmark")
            .await?;
        Self::decode(response, "add bookmark").await
    }

    /// `DELETE /coboard/{board}/{forum}?status=&user_id=` - remove a
    /// bookmark.
    pub async fn delete_bookmark(
        &self,
        board: &str,
        forum_slug: &str,
        requester: &Requester,
    ) -> Result<()> {
        let url = self.url(&self.forum_path(board, forum_slug));
        self.execute(
            self.client.delete(&url).query(&[
                ("status", requester.role.as_str()),
                ("user_id", requester.id.as_str()),
            ]),
            "delete bookmark",
        )
        .await?;
        Ok(())
    }

    /// `GET /` - every registered user, both classes.
    pub async fn fetch_users(&self) -> Result<UserDirectory> {
        let url = self.url("/");
        let response = self.execute(self.client.get(&url), "fetch users").await?;
        Self::decode(response, "fetch users").await
    }

    /// `GET /user/{id}` - profile page for either user class.
    pub async fn fetch_profile(&self, id: &str) -> Result<ProfilePage> {
        let url = self.url(&format!("/user/{}", urlencoding::encode(id)));
        let response = self.execute(self.client.get(&url), "fetch profile").await?;
        Self::decode(response, "fetch profile").await
    }

    /// `PUT /user/{id}` - update a profile.
    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<()> {
        let url = self.url(&format!("/user/{}", urlencoding::encode(id)));
        self.execute(self.client.put(&url).json(update), "update profile")
            .await?;
        Ok(())
    }

    /// `POST /signup` - create an anonymous user.
    pub async fn signup(&self, user: &NewAnonymousUser) -> Result<AnonymousUser> {
        let url = self.url("/signup");
        let response = self.execute(self.client.post(&url).json(user), "signup").await?;
        Self::decode(response, "signup").await
    }

    /// `POST /sendmail` - trigger the password-reset mail.
    pub async fn send_mail(&self, mail: &EmailRequest) -> Result<()> {
        let url = self.url("/sendmail");
        self.execute(self.client.post(&url).json(mail), "send mail").await?;
        Ok(())
    }

    /// `POST /file` - upload a file to the requester's archive.
    ///
    /// The backend expects the absent owner column and an absent post id as
    /// the literal string `"null"`.
    pub async fn upload_file(
        &self,
        path: &Path,
        requester: &Requester,
        post_id: Option<i64>,
    ) -> Result<UploadReceipt> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("upload file: invalid file name in {}", path.display()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow!("upload file: failed to read {}: {}", path.display(), e))?;

        let (s_owner, a_owner) = match requester.role {
            Role::Se => (requester.id.clone(), "null".to_string()),
            Role::Anonymous => ("null".to_string(), requester.id.clone()),
        };
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(filename),
            )
            .text("s_owner", s_owner)
            .text("a_owner", a_owner)
            .text(
                "post_id",
                post_id.map(|id| id.to_string()).unwrap_or_else(|| "null".to_string()),
            );

        let url = self.url("/file");
        let response = self
            .execute(self.client.post(&url).multipart(form), "upload file")
            .await?;
        Self::decode(response, "upload file").await
    }

    /// `GET /file/{file_id}` - download a file into `dest_dir`, named after
    /// the `Content-Disposition` header.
    pub async fn download_file(&self, file_id: i64, dest_dir: &Path) -> Result<PathBuf> {
        let url = self.url(&format!("/file/{}", file_id));
        let response = self.execute(self.client.get(&url), "download file").await?;

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| format!("file_{}", file_id));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| anyhow!("download file: failed to read body: {}", e))?;

        let dest = dest_dir.join(&filename);
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(|e| anyhow!("download file: failed to write {}: {}", dest.display(), e))?;
        Ok(dest)
    }
}

/// Extract the download filename from a `Content-Disposition` header value.
///
/// Prefers the RFC 5987 `filename*=UTF-8''...` form (percent-decoded), then
/// falls back to the plain quoted `filename="..."` form. Any path components
/// are stripped so the result is always a bare file name.
fn filename_from_disposition(value: &str) -> Option<String> {
    let decoded = if let Some(encoded) = value.split("filename*=UTF-8''").nth(1) {
        let encoded = encoded.split(';').next().unwrap_or(encoded).trim();
        percent_encoding::percent_decode_str(encoded)
            .decode_utf8()
            .ok()?
            .into_owned()
    } else {
        let rest = value.split("filename=").nth(1)?;
        let rest = rest.split(';').next().unwrap_or(rest).trim();
        rest.trim_matches('"').to_string()
    };

    let name = decoded.rsplit(['/', '\\']).next().unwrap_or(&decoded).to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
