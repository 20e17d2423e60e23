// https://www.bls.gov/cew/additional-resources/open-data/csv-data-slices.htm

use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};

use super::API_ROOT;
use super::http::{HttpClient, UreqClient};
use super::table::QcewTable;
use crate::error::{QcewError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Area,
    Industry,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Year,
    Quarter,
    Area,
    Industry,
    Size,
}

impl Parameter {
    /// Substitution order.
    pub const ALL: [Parameter; 5] = [
        Parameter::Year,
        Parameter::Quarter,
        Parameter::Area,
        Parameter::Industry,
        Parameter::Size,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Parameter::Year => "YEAR",
            Parameter::Quarter => "QTR",
            Parameter::Area => "AREA",
            Parameter::Industry => "INDUSTRY",
            Parameter::Size => "SIZE",
        }
    }
}

impl Method {
    /// Path below the API root. Size slices only exist for the first quarter, so that
    /// template has no quarter token.
    pub fn template(self) -> &'static str {
        match self {
            Method::Area => "YEAR/QTR/area/AREA.csv",
            Method::Industry => "YEAR/QTR/industry/INDUSTRY.csv",
            Method::Size => "YEAR/1/size/SIZE.csv",
        }
    }

    pub fn required(self) -> &'static [Parameter] {
        match self {
            Method::Area => &[Parameter::Area, Parameter::Year, Parameter::Quarter],
            Method::Industry => &[Parameter::Industry, Parameter::Year, Parameter::Quarter],
            Method::Size => &[Parameter::Size, Parameter::Year],
        }
    }

    pub fn missing_message(self) -> &'static str {
        match self {
            Method::Area => "Missing parameter for area request. The area, year and quarter parameters are needed.",
            Method::Industry => "Missing parameter for industry request. The industry, year and quarter parameters are needed.",
            Method::Size => "Missing parameter for size request. The size and year parameters are needed.",
        }
    }
}

impl FromStr for Method {
    type Err = QcewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_ref() {
            "area" => Ok(Method::Area),
            "industry" => Ok(Method::Industry),
            "size" => Ok(Method::Size),
            _ => Err(QcewError::InvalidMethod(s.to_owned())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Area => write!(f, "area"),
            Method::Industry => write!(f, "industry"),
            Method::Size => write!(f, "size"),
        }
    }
}

/// Caller supplied codes. `None` means the caller never gave the value; an empty string
/// was given and counts as present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QcewParams {
    pub year: Option<String>,
    pub quarter: Option<String>,
    pub area: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
}

impl QcewParams {
    pub fn new() -> QcewParams {
        QcewParams::default()
    }

    pub fn year(mut self, year: &str) -> Self {
        self.year = Some(year.to_owned());
        self
    }

    pub fn quarter(mut self, quarter: &str) -> Self {
        self.quarter = Some(quarter.to_owned());
        self
    }

    pub fn area(mut self, area: &str) -> Self {
        self.area = Some(area.to_owned());
        self
    }

    pub fn industry(mut self, industry: &str) -> Self {
        self.industry = Some(industry.to_owned());
        self
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_owned());
        self
    }

    pub fn get(&self, parameter: Parameter) -> Option<&str> {
        match parameter {
            Parameter::Year => self.year.as_deref(),
            Parameter::Quarter => self.quarter.as_deref(),
            Parameter::Area => self.area.as_deref(),
            Parameter::Industry => self.industry.as_deref(),
            Parameter::Size => self.size.as_deref(),
        }
    }
}

/// A template for one method, rooted at an API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplate {
    pub method: Method,
    pub template: String,
}

impl UrlTemplate {
    pub fn new(root: &str, method: Method) -> UrlTemplate {
        UrlTemplate {
            method,
            template: format!("{}/{}", root.trim_end_matches('/'), method.template()),
        }
    }

    /// Replaces the first occurrence of each supplied parameter's token, then checks the
    /// method's required parameters. Literal and case sensitive; codes are never escaped.
    pub fn render(&self, params: &QcewParams) -> Result<String> {
        let mut url = self.template.clone();
        let mut present = Vec::new();

        for parameter in Parameter::ALL.iter() {
            if let Some(value) = params.get(*parameter) {
                url = url.replacen(parameter.token(), value, 1);
                present.push(*parameter);
            }
        }

        if self.method.required().iter().all(|p| present.contains(p)) {
            Ok(url)
        } else {
            Err(QcewError::MissingParameter(self.method))
        }
    }

    /// Root-parameterized form of `build_url`.
    pub fn build(root: &str, method: &str, params: &QcewParams) -> Result<String> {
        let method = method.parse::<Method>()?;
        UrlTemplate::new(root, method).render(params)
    }
}

/// Builds the request URL against the public BLS endpoint without fetching anything.
pub fn build_url(method: &str, params: &QcewParams) -> Result<String> {
    UrlTemplate::build(API_ROOT, method, params)
}

/// Fetches one QCEW slice from the public endpoint.
///
/// An unknown method or a missing parameter is reported as `Err` before any request is
/// made and should be read as "no data". The diagnostic is also logged at warn level.
/// Transport and CSV failures are passed through untouched.
pub fn fetch(method: &str, params: &QcewParams) -> Result<QcewTable> {
    fetch_with(&UreqClient::default(), API_ROOT, method, params)
}

pub fn fetch_with<C: HttpClient>(client: &C, root: &str, method: &str, params: &QcewParams) -> Result<QcewTable> {
    let url = match UrlTemplate::build(root, method, params) {
        Ok(url) => { url },
        Err(e) => {
            if e.is_diagnostic() {
                warn!("{}", e);
            }
            return Err(e);
        }
    };

    debug!("QCEW request URL: {}", url);

    let body = client.get_text(&url)?;
    let table = QcewTable::from_csv_str(&body)?;

    info!("Retrieved {} rows from {}", table.len(), url);

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeClient {
        body: String,
        requested: RefCell<Vec<String>>,
    }

    impl FakeClient {
        fn new(body: &str) -> FakeClient {
            FakeClient {
                body: body.to_owned(),
                requested: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requested.borrow().len()
        }
    }

    impl HttpClient for FakeClient {
        fn get_text(&self, url: &str) -> Result<String> {
            self.requested.borrow_mut().push(url.to_owned());
            Ok(self.body.clone())
        }
    }

    struct FailingClient;

    impl HttpClient for FailingClient {
        fn get_text(&self, url: &str) -> Result<String> {
            Err(QcewError::Status {
                url: url.to_owned(),
                status: 404,
                status_text: "Not Found".to_owned(),
            })
        }
    }

    const BODY: &str = "area_fips,own_code,year,qtr,avg_wkly_wage\n26000,0,2017,1,1002\n26000,1,2017,1, \n";

    fn full() -> QcewParams {
        QcewParams::new().year("2017").quarter("1").area("26000").industry("1012").size("6")
    }

    #[test]
    fn test_area_url() {
        let params = QcewParams::new().year("2017").quarter("1").area("26000");
        assert_eq!(build_url("area", &params).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/area/26000.csv");
    }

    #[test]
    fn test_industry_url() {
        let params = QcewParams::new().year("2017").quarter("1").industry("1012");
        assert_eq!(build_url("industry", &params).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/industry/1012.csv");
    }

    #[test]
    fn test_size_url_ignores_quarter() {
        let params = QcewParams::new().year("2017").size("6");
        assert_eq!(build_url("size", &params).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/size/6.csv");

        let params = params.quarter("3");
        assert_eq!(build_url("size", &params).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/size/6.csv");
    }

    #[test]
    fn test_unrelated_parameters_are_ignored() {
        assert_eq!(build_url("area", &full()).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/area/26000.csv");
        assert_eq!(build_url("industry", &full()).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/industry/1012.csv");
    }

    #[test]
    fn test_method_case_insensitive() {
        let params = QcewParams::new().year("2017").quarter("1").area("26000");
        for method in &["AREA", "Area", "area", "aReA"] {
            assert_eq!(method.parse::<Method>().unwrap(), Method::Area);
            assert_eq!(build_url(method, &params).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/area/26000.csv");
        }
        assert_eq!("INDUSTRY".parse::<Method>().unwrap(), Method::Industry);
        assert_eq!("Size".parse::<Method>().unwrap(), Method::Size);
    }

    #[test]
    fn test_quarter_code_kept_literally() {
        let params = QcewParams::new().year("2016").quarter("a").area("US000");
        assert_eq!(build_url("area", &params).unwrap(), "https://data.bls.gov/cew/data/api/2016/a/area/US000.csv");
    }

    #[test]
    fn test_empty_string_counts_as_supplied() {
        let params = QcewParams::new().year("").quarter("1").area("26000");
        assert_eq!(build_url("area", &params).unwrap(), "https://data.bls.gov/cew/data/api//1/area/26000.csv");
    }

    #[test]
    fn test_first_occurrence_only() {
        // the area code contains the year token; substitution must not revisit it
        let params = QcewParams::new().year("2017").quarter("1").area("YEAR");
        assert_eq!(build_url("area", &params).unwrap(), "https://data.bls.gov/cew/data/api/2017/1/area/YEAR.csv");
    }

    #[test]
    fn test_custom_root() {
        let params = QcewParams::new().year("2017").size("6");
        assert_eq!(
            UrlTemplate::build("http://localhost:8080/api/", "size", &params).unwrap(),
            "http://localhost:8080/api/2017/1/size/6.csv"
        );
    }

    #[test]
    fn test_invalid_method_makes_no_request() {
        for method in &["", "county", "areas", "sizes", " area", "industry "] {
            let client = FakeClient::new(BODY);
            let result = fetch_with(&client, API_ROOT, method, &full());

            match result {
                Err(QcewError::InvalidMethod(m)) => assert_eq!(m, *method),
                other => panic!("expected invalid method for {:?}, got {:?}", method, other),
            }
            assert_eq!(client.calls(), 0);
        }
    }

    #[test]
    fn test_area_missing_parameters() {
        let cases = vec![
            QcewParams::new().quarter("1").area("26000"),
            QcewParams::new().year("2017").area("26000"),
            QcewParams::new().year("2017").quarter("1"),
            QcewParams::new().year("2017").quarter("1").industry("1012").size("6"),
        ];

        for params in cases {
            let client = FakeClient::new(BODY);
            let error = fetch_with(&client, API_ROOT, "area", &params).unwrap_err();

            assert_eq!(error.to_string(), "Missing parameter for area request. The area, year and quarter parameters are needed.");
            assert_eq!(client.calls(), 0);
        }
    }

    #[test]
    fn test_industry_missing_parameters() {
        let cases = vec![
            QcewParams::new().quarter("1").industry("1012"),
            QcewParams::new().year("2017").industry("1012"),
            QcewParams::new().year("2017").quarter("1").area("26000"),
        ];

        for params in cases {
            let client = FakeClient::new(BODY);
            let error = fetch_with(&client, API_ROOT, "Industry", &params).unwrap_err();

            assert_eq!(error.to_string(), "Missing parameter for industry request. The industry, year and quarter parameters are needed.");
            assert_eq!(client.calls(), 0);
        }
    }

    #[test]
    fn test_size_missing_parameters() {
        let cases = vec![
            QcewParams::new().size("6"),
            QcewParams::new().year("2017"),
            QcewParams::new().year("2017").quarter("1").area("26000"),
        ];

        for params in cases {
            let client = FakeClient::new(BODY);
            let error = fetch_with(&client, API_ROOT, "SIZE", &params).unwrap_err();

            assert!(matches!(error, QcewError::MissingParameter(Method::Size)));
            assert_eq!(client.calls(), 0);
        }
    }

    #[test]
    fn test_fetch_requests_built_url() {
        let client = FakeClient::new(BODY);
        let params = QcewParams::new().year("2017").quarter("1").area("26000");
        let table = fetch_with(&client, API_ROOT, "Area", &params).unwrap();

        assert_eq!(*client.requested.borrow(), vec!["https://data.bls.gov/cew/data/api/2017/1/area/26000.csv".to_owned()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "avg_wkly_wage"), Some("1002"));
        assert_eq!(table.get(1, "avg_wkly_wage"), None);
    }

    #[test]
    fn test_transport_errors_pass_through() {
        let params = QcewParams::new().year("2017").size("6");
        let error = fetch_with(&FailingClient, API_ROOT, "size", &params).unwrap_err();

        match error {
            QcewError::Status { url, status, .. } => {
                assert_eq!(url, "https://data.bls.gov/cew/data/api/2017/1/size/6.csv");
                assert_eq!(status, 404);
            },
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_csv_error() {
        let client = FakeClient::new("a,b\n1,2,3\n");
        let params = QcewParams::new().year("2017").size("6");

        assert!(matches!(fetch_with(&client, API_ROOT, "size", &params), Err(QcewError::Csv(_))));
    }
}
