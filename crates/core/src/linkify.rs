//! Display-link formatting for study listings and sharing responses.

/// Escape the characters that would break out of an HTML attribute or text node.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// `<a target="_blank" href="mailto:EMAIL">NAME</a>`
pub fn study_person_link(email: &str, name: &str) -> String {
    format!(
        "<a target=\"_blank\" href=\"mailto:{}\">{}</a>",
        escape(email),
        escape(name)
    )
}

/// Link to the PubMed entry for `pmid`.
pub fn pubmed_link(pmid: &str) -> String {
    let pmid = escape(pmid);
    format!("<a target=\"_blank\" href=\"http://www.ncbi.nlm.nih.gov/pubmed/{pmid}\">{pmid}</a>")
}

/// Join already-formatted links into the comma separated display string.
pub fn join_links<I>(links: I) -> String
where
    I: IntoIterator<Item = String>,
{
    links.into_iter().collect::<Vec<_>>().join(", ")
}
