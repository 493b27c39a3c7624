//! X/Twitter page knowledge: selectors, URLs and the page scripts built from them.

use serde::Deserialize;
use vibey_protocols::Post;

use crate::cdp::Viewport;

pub(crate) const DEFAULT_HOME_URL: &str = "https://twitter.com";
const SEARCH_URL: &str = "https://twitter.com/search";

pub(crate) const ARTICLE: &str = r#"article[data-testid="tweet"]"#;
pub(crate) const TEXT: &str = r#"[data-testid="tweetText"]"#;
pub(crate) const STATUS_LINK: &str = r#"a[href*="/status/"]"#;
pub(crate) const LIKE: &str = r#"[data-testid="like"]"#;
pub(crate) const RETWEET: &str = r#"[data-testid="retweet"]"#;
pub(crate) const RETWEET_CONFIRM: &str = r#"[data-testid="retweetConfirm"]"#;
pub(crate) const REPLY: &str = r#"[data-testid="reply"]"#;
pub(crate) const COMPOSE: &str = r#"[data-testid="tweetTextarea_0"]"#;
pub(crate) const SUBMIT: &str = r#"[data-testid="tweetButton"]"#;

/// Attribute stamped on each discovered article so it can be found again.
const KEY_ATTRIBUTE: &str = "data-vibey-key";

/// Live search URL for the keywords joined with `OR`; `None` without keywords.
pub fn search_url(keywords: &[String]) -> Option<String> {
    let terms: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if terms.is_empty() {
        return None;
    }
    let mut url = url::Url::parse(SEARCH_URL).ok()?;
    url.query_pairs_mut()
        .append_pair("q", &terms.join(" OR "))
        .append_pair("src", "typed_query")
        .append_pair("f", "live");
    Some(url.into())
}

/// Whether the browser was bounced to a sign-in flow.
pub fn is_login_url(url: &str) -> bool {
    url.contains("login") || url.contains("i/flow")
}

/// Post id from a `/status/<id>` link.
pub fn status_id_from_href(href: &str) -> Option<String> {
    let (_, rest) = href.split_once("/status/")?;
    let id = rest
        .split(['?', '#', '/'])
        .next()
        .unwrap_or_default()
        .trim();
    (!id.is_empty()).then(|| id.to_string())
}

/// Selector for an element inside the article stamped with `key`.
pub(crate) fn within(key: &str, inner: &str) -> String {
    let key: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let article = format!(r#"article[{}="{}"]"#, KEY_ATTRIBUTE, key);
    if inner.is_empty() {
        article
    } else {
        format!("{} {}", article, inner)
    }
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Stamps unkeyed articles and returns every visible article key in DOM order.
pub(crate) fn tag_articles_script() -> String {
    format!(
        r#"(() => {{
  window.__vibeyNext = window.__vibeyNext || 0;
  return Array.from(document.querySelectorAll({articles})).map(a => {{
    if (!a.getAttribute({attr})) {{
      window.__vibeyNext += 1;
      a.setAttribute({attr}, 'v' + window.__vibeyNext);
    }}
    return a.getAttribute({attr});
  }});
}})()"#,
        articles = js_string(ARTICLE),
        attr = js_string(KEY_ATTRIBUTE),
    )
}

/// Reads text, status link and document-space bounds of one article, or `null` once it is gone.
pub(crate) fn extract_script(key: &str) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelector({article});
  if (!el) return null;
  const text = el.querySelector({text});
  const link = el.querySelector({link});
  const r = el.getBoundingClientRect();
  return {{
    text: text ? text.innerText : null,
    href: link ? link.href : null,
    rect: {{ x: r.left + window.scrollX, y: r.top + window.scrollY, width: r.width, height: r.height }}
  }};
}})()"#,
        article = js_string(&within(key, "")),
        text = js_string(TEXT),
        link = js_string(STATUS_LINK),
    )
}

pub(crate) fn scroll_script(pixels: u32) -> String {
    format!("window.scrollBy({{ top: {}, behavior: 'smooth' }})", pixels)
}

/// Raw result of [`extract_script`].
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExtractedArticle {
    pub text: Option<String>,
    pub href: Option<String>,
    pub rect: Option<Viewport>,
}

impl ExtractedArticle {
    pub(crate) fn into_post(self, handle: &str) -> Option<Post> {
        let id = self.href.as_deref().and_then(status_id_from_href);
        Post::from_parts(id, self.text, self.href.unwrap_or_default())
            .map(|post| post.with_handle(handle))
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
