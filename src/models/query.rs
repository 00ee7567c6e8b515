//! arXiv API query parameters and prepared requests.

use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::ArxivError;

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Largest `max_results` the arXiv API accepts in one request
pub const MAX_MAX_RESULTS: u32 = 2000;

/// Sort field accepted by the arXiv API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    SubmittedDate,
    LastUpdatedDate,
    Relevance,
}

impl SortBy {
    /// Every value the API accepts, in the order it documents them
    pub const ALL: [SortBy; 3] = [
        SortBy::SubmittedDate,
        SortBy::LastUpdatedDate,
        SortBy::Relevance,
    ];

    /// Returns the value sent in the `sortBy` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::SubmittedDate => "submittedDate",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
            SortBy::Relevance => "relevance",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = ArxivError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| {
                let valid = SortBy::ALL.map(|sort| sort.as_str()).join(", ");
                ArxivError::InvalidInput(format!(
                    "Invalid sort_by value '{}'. Must be one of: {}",
                    s, valid
                ))
            })
    }
}

/// Sort direction sent alongside `sortBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ArxivError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SortOrder::Ascending),
            "descending" => Ok(SortOrder::Descending),
            other => Err(ArxivError::InvalidInput(format!(
                "Invalid sortOrder value '{}'",
                other
            ))),
        }
    }
}

/// Validated query-string parameters for one arXiv API call.
///
/// `search_query` and `id_list` may both be present; the API then returns
/// only the listed ids that also match the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// Comma-joined arXiv identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_list: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,

    pub max_results: u32,

    #[serde(rename = "sortBy", default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,

    #[serde(rename = "sortOrder", default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl QueryParameters {
    /// Key/value pairs in the order they appear in the query string
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);
        if let Some(query) = &self.search_query {
            pairs.push(("search_query", query.clone()));
        }
        if let Some(ids) = &self.id_list {
            pairs.push(("id_list", ids.clone()));
        }
        if let Some(start) = self.start {
            pairs.push(("start", start.to_string()));
        }
        pairs.push(("max_results", self.max_results.to_string()));
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sortBy", sort_by.as_str().to_string()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder", order.as_str().to_string()));
        }
        pairs
    }

    /// Rebuild parameters from decoded query-string pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ArxivError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut search_query = None;
        let mut id_list = None;
        let mut start = None;
        let mut max_results = None;
        let mut sort_by = None;
        let mut sort_order = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "search_query" => search_query = Some(value.to_string()),
                "id_list" => id_list = Some(value.to_string()),
                "start" => start = Some(parse_count("start", value)?),
                "max_results" => max_results = Some(parse_count("max_results", value)?),
                "sortBy" => sort_by = Some(value.parse::<SortBy>()?),
                "sortOrder" => sort_order = Some(value.parse::<SortOrder>()?),
                other => {
                    return Err(ArxivError::InvalidInput(format!(
                        "Unknown query parameter '{}'",
                        other
                    )))
                }
            }
        }

        let max_results = max_results.ok_or_else(|| {
            ArxivError::InvalidInput("Query string has no max_results".to_string())
        })?;

        Ok(Self {
            search_query,
            id_list,
            start,
            max_results,
            sort_by,
            sort_order,
        })
    }
}

fn parse_count(key: &str, value: &str) -> Result<u32, ArxivError> {
    value.parse().map_err(|_| {
        ArxivError::InvalidInput(format!("{} must be a non-negative integer, got '{}'", key, value))
    })
}

/// An unsent GET request against the arXiv API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
}

impl PreparedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full URL, query string included
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Decode the query string back into parameters
    pub fn query_parameters(&self) -> Result<QueryParameters, ArxivError> {
        QueryParameters::from_pairs(self.url.query_pairs())
    }
}

impl fmt::Display for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Search arguments for the arXiv API, validated by [`QueryBuilder::build_parameters`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBuilder {
    /// arXiv search expression, e.g. `ti:transformer AND cat:cs.CL`
    pub search_terms: Option<String>,

    /// arXiv identifiers to fetch
    pub id_list: Option<Vec<String>>,

    /// Result offset; `None` leaves the key out of the query string
    pub start: Option<u32>,

    /// Maximum number of results to return
    pub max_results: u32,

    /// Sort field name, checked against [`SortBy`] when building
    pub sort_by: Option<String>,

    /// Sort ascending instead of descending (only used with `sort_by`)
    pub ascending: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            search_terms: None,
            id_list: None,
            start: Some(0),
            max_results: 10,
            sort_by: None,
            ascending: false,
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for a search expression
    pub fn search(terms: impl Into<String>) -> Self {
        Self::new().search_terms(terms)
    }

    /// Create a builder for a list of identifiers
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().id_list(ids)
    }

    pub fn search_terms(mut self, terms: impl Into<String>) -> Self {
        self.search_terms = Some(terms.into());
        self
    }

    pub fn id_list<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_list = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// Leave `start` out of the query string
    pub fn without_start(mut self) -> Self {
        self.start = None;
        self
    }

    pub fn max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Validate the arguments and produce the query-string parameters
    pub fn build_parameters(&self) -> Result<QueryParameters, ArxivError> {
        let search_query = self
            .search_terms
            .as_deref()
            .filter(|terms| !terms.is_empty())
            .map(str::to_string);
        let id_list = self
            .id_list
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .map(|ids| ids.join(","));

        if search_query.is_none() && id_list.is_none() {
            return Err(ArxivError::InvalidInput(
                "search_terms and id_list can't both be empty, there's nothing to request"
                    .to_string(),
            ));
        }

        if self.max_results > MAX_MAX_RESULTS {
            return Err(ArxivError::InvalidInput(format!(
                "Invalid max_results value {}. Must be at most {}",
                self.max_results, MAX_MAX_RESULTS
            )));
        }

        let sort_by = self
            .sort_by
            .as_deref()
            .map(str::parse::<SortBy>)
            .transpose()?;
        let sort_order = sort_by.map(|_| SortOrder::from_ascending(self.ascending));

        Ok(QueryParameters {
            search_query,
            id_list,
            start: self.start,
            max_results: self.max_results,
            sort_by,
            sort_order,
        })
    }

    /// Build an unsent GET request against the public arXiv endpoint
    pub fn build_request(&self) -> Result<PreparedRequest, ArxivError> {
        let endpoint = Url::parse(ARXIV_API_URL)?;
        self.build_request_for(&endpoint)
    }

    /// Build an unsent GET request against `endpoint`
    pub fn build_request_for(&self, endpoint: &Url) -> Result<PreparedRequest, ArxivError> {
        let params = self.build_parameters()?;

        let mut url = endpoint.clone();
        url.query_pairs_mut().clear().extend_pairs(params.pairs());

        tracing::debug!("Prepared arXiv request: {}", url);

        Ok(PreparedRequest {
            method: Method::GET,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let params = QueryBuilder::search("all:electron").build_parameters().unwrap();

        assert_eq!(params.search_query.as_deref(), Some("all:electron"));
        assert_eq!(params.id_list, None);
        assert_eq!(params.start, Some(0));
        assert_eq!(params.max_results, 10);
        assert_eq!(params.sort_by, None);
        assert_eq!(params.sort_order, None);
    }

    #[test]
    fn test_nothing_to_query() {
        let err = QueryBuilder::new().build_parameters().unwrap_err();
        assert!(matches!(err, ArxivError::InvalidInput(_)));

        // Empty inputs count as absent
        let err = QueryBuilder::search("")
            .id_list(Vec::<String>::new())
            .build_parameters()
            .unwrap_err();
        assert!(matches!(err, ArxivError::InvalidInput(_)));
    }

    #[test]
    fn test_id_list_joined() {
        let params = QueryBuilder::ids(["2301.12345", "1234.5678v2"])
            .build_parameters()
            .unwrap();
        assert_eq!(params.id_list.as_deref(), Some("2301.12345,1234.5678v2"));
        assert_eq!(params.search_query, None);
    }

    #[test]
    fn test_search_and_ids_coexist() {
        let params = QueryBuilder::search("cat:cs.AI")
            .id_list(["2301.12345"])
            .build_parameters()
            .unwrap();
        assert_eq!(params.search_query.as_deref(), Some("cat:cs.AI"));
        assert_eq!(params.id_list.as_deref(), Some("2301.12345"));

        let keys: Vec<&str> = params.pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["search_query", "id_list", "start", "max_results"]);
    }

    #[test]
    fn test_max_results_ceiling() {
        for max in [1, 10, 500, 1999, MAX_MAX_RESULTS] {
            let params = QueryBuilder::search("q").max_results(max).build_parameters();
            assert_eq!(params.unwrap().max_results, max);
        }

        let err = QueryBuilder::search("q")
            .max_results(MAX_MAX_RESULTS + 1)
            .build_parameters()
            .unwrap_err();
        assert!(matches!(err, ArxivError::InvalidInput(_)));
    }

    #[test]
    fn test_start_can_be_omitted() {
        let params = QueryBuilder::search("q").without_start().build_parameters().unwrap();
        assert_eq!(params.start, None);
        assert!(params.pairs().iter().all(|(k, _)| *k != "start"));
    }

    #[test]
    fn test_sort_order_follows_ascending_flag() {
        let params = QueryBuilder::search("q")
            .sort_by("relevance")
            .ascending(true)
            .build_parameters()
            .unwrap();
        assert_eq!(params.sort_by, Some(SortBy::Relevance));
        assert_eq!(params.sort_order, Some(SortOrder::Ascending));

        let params = QueryBuilder::search("q")
            .sort_by("relevance")
            .build_parameters()
            .unwrap();
        assert_eq!(params.sort_order, Some(SortOrder::Descending));
    }

    #[test]
    fn test_ascending_without_sort_by_is_ignored() {
        let params = QueryBuilder::search("q").ascending(true).build_parameters().unwrap();
        assert_eq!(params.sort_order, None);
    }

    #[test]
    fn test_invalid_sort_by() {
        let err = QueryBuilder::search("q")
            .sort_by("not_a_real_field")
            .build_parameters()
            .unwrap_err();
        assert!(matches!(err, ArxivError::InvalidInput(_)));
        assert!(err.to_string().contains("submittedDate"));
    }

    #[test]
    fn test_sort_by_is_case_sensitive() {
        assert!("submitteddate".parse::<SortBy>().is_err());
        assert_eq!(
            "lastUpdatedDate".parse::<SortBy>().unwrap(),
            SortBy::LastUpdatedDate
        );
    }

    #[test]
    fn test_build_request() {
        let request = QueryBuilder::search("ti:deep learning")
            .max_results(5)
            .sort_by("submittedDate")
            .build_request()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().host_str(), Some("export.arxiv.org"));
        assert_eq!(request.url().path(), "/api/query");
        assert_eq!(
            request.url().query(),
            Some("search_query=ti%3Adeep+learning&start=0&max_results=5&sortBy=submittedDate&sortOrder=descending")
        );
        assert!(request.to_string().starts_with("GET http://export.arxiv.org/api/query?"));
    }

    #[test]
    fn test_build_request_rejects_invalid_input() {
        let result = QueryBuilder::search("q").max_results(5000).build_request();
        assert!(matches!(result, Err(ArxivError::InvalidInput(_))));
    }

    #[test]
    fn test_prepared_request_round_trip() {
        let builders = [
            QueryBuilder::search("au:del_maestro AND ti:checkerboard"),
            QueryBuilder::ids(["2301.12345", "hep-th/9901001v1"]).start(40),
            QueryBuilder::search("cat:cs.CL")
                .id_list(["1234.5678"])
                .without_start()
                .max_results(2000)
                .sort_by("lastUpdatedDate")
                .ascending(true),
        ];

        for builder in builders {
            let params = builder.build_parameters().unwrap();
            let request = builder.build_request().unwrap();
            assert_eq!(request.query_parameters().unwrap(), params);
        }
    }

    #[test]
    fn test_build_request_for_replaces_existing_query() {
        let endpoint = Url::parse("http://127.0.0.1:8080/api/query?stale=1").unwrap();
        let request = QueryBuilder::search("q").build_request_for(&endpoint).unwrap();
        assert_eq!(request.url().query(), Some("search_query=q&start=0&max_results=10"));
    }

    #[test]
    fn test_from_pairs_rejects_unknown_key() {
        let result = QueryParameters::from_pairs([("max_results", "10"), ("bogus", "1")]);
        assert!(matches!(result, Err(ArxivError::InvalidInput(_))));
    }

    #[test]
    fn test_parameters_serialize_with_api_keys() {
        let params = QueryBuilder::search("q")
            .sort_by("relevance")
            .build_parameters()
            .unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["sortBy"], "relevance");
        assert_eq!(json["sortOrder"], "descending");
        assert!(json.get("id_list").is_none());
    }
}
