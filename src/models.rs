//! Data models passed between the pipeline stages.
//!
//! - [`RawArticleBatch`]: scraped, uncleaned article fields, newest first
//! - [`NormalizedRecord`]: one cleaned article, the pipeline's final output

use itertools::izip;
use serde::{Deserialize, Serialize};

/// Numeric article identifier from the portal's URL scheme.
pub type ArticleId = u64;

/// A batch of scraped articles held as four aligned sequences.
///
/// Index `i` across `titles`, `contents`, `times` and `article_nums` describes
/// one article. Rows can only be appended whole, so all four sequences always
/// have the same length.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawArticleBatch {
    titles: Vec<String>,
    contents: Vec<String>,
    times: Vec<String>,
    article_nums: Vec<ArticleId>,
}

/// One row of a [`RawArticleBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub content: String,
    pub time: String,
    pub article_num: ArticleId,
}

impl RawArticleBatch {
    #[cfg(test)]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            titles: Vec::with_capacity(n),
            contents: Vec::with_capacity(n),
            times: Vec::with_capacity(n),
            article_nums: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, article: RawArticle) {
        self.titles.push(article.title);
        self.contents.push(article.content);
        self.times.push(article.time);
        self.article_nums.push(article.article_num);
    }

    pub fn len(&self) -> usize {
        self.article_nums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.article_nums.is_empty()
    }

    #[cfg(test)]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    #[cfg(test)]
    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    #[cfg(test)]
    pub fn times(&self) -> &[String] {
        &self.times
    }

    pub fn article_nums(&self) -> &[ArticleId] {
        &self.article_nums
    }

    /// Iterate rows as `(title, content, time, article_num)`.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, &str, ArticleId)> + '_ {
        izip!(&self.titles, &self.contents, &self.times, &self.article_nums)
            .map(|(t, c, w, n)| (t.as_str(), c.as_str(), w.as_str(), *n))
    }
}

impl Extend<RawArticle> for RawArticleBatch {
    fn extend<I: IntoIterator<Item = RawArticle>>(&mut self, iter: I) {
        for article in iter {
            self.push(article);
        }
    }
}

impl FromIterator<RawArticle> for RawArticleBatch {
    fn from_iter<I: IntoIterator<Item = RawArticle>>(iter: I) -> Self {
        let mut batch = RawArticleBatch::default();
        batch.extend(iter);
        batch
    }
}

/// A cleaned article as emitted at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NormalizedRecord {
    /// Portal article identifier.
    pub article_index: ArticleId,
    /// Publication date token, `YYYY.MM.DD`.
    pub write_time: String,
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(n: ArticleId) -> RawArticle {
        RawArticle {
            title: format!("title {n}"),
            content: format!("content {n}"),
            time: "2023.06.01 09:00".to_string(),
            article_num: n,
        }
    }

    #[test]
    fn test_batch_push_keeps_sequences_aligned() {
        let mut batch = RawArticleBatch::with_capacity(2);
        batch.push(raw(10));
        batch.push(raw(9));

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.titles().len(), 2);
        assert_eq!(batch.contents().len(), 2);
        assert_eq!(batch.times().len(), 2);
        assert_eq!(batch.article_nums(), &[10, 9]);
        assert_eq!(batch.titles()[1], "title 9");
    }

    #[test]
    fn test_batch_rows_follow_insertion_order() {
        let batch: RawArticleBatch = vec![raw(3), raw(2), raw(1)].into_iter().collect();
        let nums: Vec<_> = batch.rows().map(|(_, _, _, n)| n).collect();
        assert_eq!(nums, vec![3, 2, 1]);

        let (title, content, _, _) = batch.rows().next().unwrap();
        assert_eq!(title, "title 3");
        assert_eq!(content, "content 3");
    }

    #[test]
    fn test_empty_batch() {
        let batch = RawArticleBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.rows().count(), 0);
    }

    #[test]
    fn test_normalized_record_serialization() {
        let record = NormalizedRecord {
            article_index: 7701599,
            write_time: "2023.06.01".to_string(),
            title: "제목".to_string(),
            content: "본문".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"article_index\":7701599"));
        assert!(json.contains("\"write_time\":\"2023.06.01\""));

        let back: NormalizedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
