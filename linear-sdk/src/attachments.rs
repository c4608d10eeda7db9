// ABOUTME: Recovers upload metadata from markdown text and document-model JSON
// ABOUTME: Derives sanitized file names and deduplicates uploads by URL

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use url::Url;

use crate::constants::urls::UPLOADS_HOST;
use crate::types::{Attachment, Comment};

const FALLBACK_FILE_NAME: &str = "attachment";

static MARKDOWN_UPLOAD_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://uploads\.linear\.app/[^\)\s]+)\)")
        .unwrap_or_else(|err| panic!("invalid markdown upload pattern: {err}"))
});

static BARE_UPLOAD_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://uploads\.linear\.app/[^\s\)]+")
        .unwrap_or_else(|err| panic!("invalid upload url pattern: {err}"))
});

/// Trim, replace path separators and colons, and collapse unusable names.
pub fn sanitize_file_name(name: &str) -> String {
    let name = name.trim().replace(['\\', '/', ':'], "_");
    match name.as_str() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        _ => name,
    }
}

fn last_path_segment(raw_url: &str) -> Option<String> {
    let parsed = Url::parse(raw_url).ok()?;
    let segment = parsed.path().trim_end_matches('/').rsplit('/').next()?;
    let decoded = urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    match decoded.as_str() {
        "" | "." | "/" => None,
        _ => Some(decoded),
    }
}

/// Link text that looks like a file name, else the URL's last segment, else the link text.
pub fn preferred_file_name(title: &str, url: &str) -> String {
    let title = title.trim();
    if title.contains('.') {
        return sanitize_file_name(title);
    }
    if let Some(segment) = last_path_segment(url) {
        return sanitize_file_name(&segment);
    }
    if !title.is_empty() {
        return sanitize_file_name(title);
    }
    FALLBACK_FILE_NAME.to_string()
}

fn is_upload_url(raw_url: &str) -> bool {
    Url::parse(raw_url)
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host.eq_ignore_ascii_case(UPLOADS_HOST))
        })
        .unwrap_or(false)
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

fn recovered(url: &str, title: Option<&str>) -> Attachment {
    let title = non_empty(title).map(str::to_string);
    Attachment {
        id: url.to_string(),
        file_name: preferred_file_name(title.as_deref().unwrap_or_default(), url),
        title,
        url: url.to_string(),
        ..Default::default()
    }
}

/// Keeps the first attachment seen for each URL, in order.
#[derive(Debug, Default)]
struct UploadCollector {
    seen: HashSet<String>,
    uploads: Vec<Attachment>,
}

impl UploadCollector {
    fn push(&mut self, attachment: Attachment) {
        if self.seen.insert(attachment.url.clone()) {
            self.uploads.push(attachment);
        }
    }

    fn extend(&mut self, attachments: impl IntoIterator<Item = Attachment>) {
        for attachment in attachments {
            self.push(attachment);
        }
    }

    fn finish(self) -> Vec<Attachment> {
        self.uploads
    }
}

/// Markdown links and bare URLs pointing at the uploads host, in order of first appearance.
pub fn parse_upload_links(text: &str) -> Vec<Attachment> {
    let mut titles: HashMap<&str, &str> = HashMap::new();
    let mut occurrences: Vec<(usize, &str)> = Vec::new();
    let mut link_spans: Vec<(usize, usize)> = Vec::new();

    for captures in MARKDOWN_UPLOAD_LINK.captures_iter(text) {
        let (Some(whole), Some(title), Some(url)) = (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        titles.entry(url.as_str()).or_insert(title.as_str());
        occurrences.push((whole.start(), url.as_str()));
        link_spans.push((whole.start(), whole.end()));
    }

    for found in BARE_UPLOAD_URL.find_iter(text) {
        let inside_link = link_spans
            .iter()
            .any(|(start, end)| found.start() >= *start && found.end() <= *end);
        if !inside_link {
            occurrences.push((found.start(), found.as_str()));
        }
    }

    occurrences.sort_by_key(|(position, _)| *position);

    let mut collector = UploadCollector::default();
    for (_, url) in occurrences {
        collector.push(recovered(url, titles.get(url).copied()));
    }
    collector.finish()
}

fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a str> {
    node.get("attrs")?.get(name)?.as_str()
}

fn link_mark_href(node: &Value) -> Option<&str> {
    node.get("marks")?
        .as_array()?
        .iter()
        .filter(|mark| mark.get("type").and_then(Value::as_str) == Some("link"))
        .find_map(|mark| attr(mark, "href"))
}

fn collect_document_uploads(node: &Value, collector: &mut UploadCollector) {
    match node {
        Value::Array(items) => {
            for item in items {
                collect_document_uploads(item, collector);
            }
        }
        Value::Object(map) => {
            match map.get("type").and_then(Value::as_str) {
                Some("file") => {
                    if let Some(href) = non_empty(attr(node, "href")) {
                        collector.push(recovered(href, attr(node, "name")));
                    }
                }
                Some("image") => {
                    if let Some(src) = non_empty(attr(node, "src")).filter(|src| is_upload_url(src)) {
                        let title = non_empty(attr(node, "alt")).or_else(|| attr(node, "title"));
                        collector.push(recovered(src, title));
                    }
                }
                Some("text") => {
                    if let Some(href) = link_mark_href(node).filter(|href| is_upload_url(href)) {
                        let text = node.get("text").and_then(Value::as_str);
                        collector.push(recovered(href, text));
                    }
                }
                _ => {}
            }
            if let Some(content) = map.get("content") {
                collect_document_uploads(content, collector);
            }
        }
        _ => {}
    }
}

/// Uploads referenced by a document-model body. Non-JSON input yields nothing.
pub fn parse_document_uploads(body_data: &str) -> Vec<Attachment> {
    let Ok(document) = serde_json::from_str::<Value>(body_data) else {
        return Vec::new();
    };
    let mut collector = UploadCollector::default();
    collect_document_uploads(&document, &mut collector);
    collector.finish()
}

/// Document-model JSON when it parses, plain text otherwise.
fn parse_rich_body(body_data: &str) -> Vec<Attachment> {
    if serde_json::from_str::<Value>(body_data).is_ok() {
        parse_document_uploads(body_data)
    } else {
        parse_upload_links(body_data)
    }
}

/// Uploads across comments, keeping the first comment that mentions each URL.
pub fn extract_from_comments(comments: &[Comment]) -> Vec<Attachment> {
    let mut collector = UploadCollector::default();
    for comment in comments {
        let found = if !comment.body.is_empty() {
            parse_upload_links(&comment.body)
        } else if let Some(body_data) = comment.body_data.as_deref().filter(|data| !data.is_empty()) {
            parse_rich_body(body_data)
        } else {
            continue;
        };

        collector.extend(found.into_iter().map(|attachment| Attachment {
            comment_id: Some(comment.id.clone()),
            created_at: comment.created_at.clone(),
            ..attachment
        }));
    }
    collector.finish()
}

/// Uploads in an issue description and its optional document-model twin.
pub fn extract_from_description(description: &str, description_data: Option<&str>) -> Vec<Attachment> {
    let mut collector = UploadCollector::default();
    collector.extend(parse_upload_links(description));
    if let Some(data) = description_data {
        collector.extend(parse_rich_body(data));
    }
    collector.finish()
}

/// Description uploads first, then comment uploads, deduplicated by URL.
pub fn merge_uploads(first: Vec<Attachment>, second: Vec<Attachment>) -> Vec<Attachment> {
    let mut collector = UploadCollector::default();
    collector.extend(first);
    collector.extend(second);
    collector.finish()
}

/// An API-reported attachment; the URL falls back to `source`.
pub fn structured_attachment(
    id: String,
    title: Option<String>,
    url: Option<String>,
    source: Option<&Value>,
    created_at: String,
) -> Attachment {
    let url = url.filter(|url| !url.is_empty()).unwrap_or_else(|| {
        source
            .and_then(|source| match source {
                Value::String(text) => Some(text.clone()),
                Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .unwrap_or_default()
    });
    let title = title.filter(|title| !title.is_empty());
    Attachment {
        file_name: preferred_file_name(title.as_deref().unwrap_or_default(), &url),
        id,
        title,
        url,
        content_type: None,
        created_at,
        comment_id: None,
    }
}
