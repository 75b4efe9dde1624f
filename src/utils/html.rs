/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) survive while dangerous tags
/// (like <script>, <iframe>) and attributes (like onclick) are stripped.
/// Applied to the free-form descriptions of quizzes and events before storage.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
