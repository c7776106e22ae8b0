use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const REMOTE_PREFIXES: &[&str] = &["git://", "http://", "https://", "git@"];

fn hash_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[a-f0-9]{40}|[a-f0-9]{64})$").unwrap())
}

/// True when the argument names a remote repository rather than a local path.
pub fn is_remote(source: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| source.starts_with(p))
}

/// True for sha1 and sha256 commit hashes.
pub fn is_hash(s: &str) -> bool {
    hash_pattern().is_match(s)
}

/// Branch name to fully qualified ref (`main` -> `refs/heads/main`).
pub fn expand_ref(name: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("refs/heads/{}", name)
    }
}

/// Name usable with `git clone --branch`, or `None` for refs outside
/// heads and tags (pull request refs and the like).
pub(super) fn branch_name(reference: &str) -> Option<&str> {
    if !reference.starts_with("refs/") {
        return Some(reference);
    }
    reference
        .strip_prefix("refs/heads/")
        .or_else(|| reference.strip_prefix("refs/tags/"))
}

/// Embeds credentials into an `http(s)` URL, replacing any userinfo already
/// present. Other URL forms are returned unchanged.
pub fn with_credentials(repo: &str, username: Option<&str>, password: Option<&str>) -> String {
    let Some(username) = username.filter(|u| !u.is_empty()) else {
        return repo.to_string();
    };
    let Ok(mut url) = Url::parse(repo) else {
        return repo.to_string();
    };
    if !matches!(url.scheme(), "http" | "https") {
        return repo.to_string();
    }

    if url.set_username(username).is_err()
        || url
            .set_password(password.filter(|p| !p.is_empty()))
            .is_err()
    {
        return repo.to_string();
    }
    url.to_string()
}

/// Masks the password of a URL for logging. URLs without one are returned
/// unchanged.
pub(super) fn redact(repo: &str) -> String {
    match Url::parse(repo) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => repo.to_string(),
    }
}

fn url_token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[A-Za-z][A-Za-z0-9+.-]*://[^\s'"]+"#).unwrap())
}

/// Masks passwords in every URL found in free text such as git stderr.
pub(super) fn redact_text(text: &str) -> String {
    url_token_pattern()
        .replace_all(text, |caps: &regex::Captures| redact(&caps[0]))
        .into_owned()
}
