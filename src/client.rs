use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::errors::{RulerError, Result};
use crate::types::{RuleGroup, RuleSet};

/// Header carrying the tenant id on every request
const ORG_ID_HEADER: &str = "X-Scope-OrgID";
const RULES_PATH: [&str; 3] = ["api", "prom", "rules"];

/// Tenant-scoped client for managing rule groups through a ruler API
///
/// Every request carries the `X-Scope-OrgID` header; basic auth is added when
/// a key is configured. The client holds no mutable state and is cheap to
/// clone, so one instance can serve concurrent callers. Dropping a returned
/// future aborts its in-flight request.
///
/// # Example
///
/// ```rust,no_run
/// use ruler_api::{Config, Rule, RuleGroup, RulerClient};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::new("http://localhost:8080", "tenant-a").with_key("secret");
///     let client = RulerClient::new(config, Duration::from_secs(10))?;
///
///     let group = RuleGroup::new("availability")
///         .with_rule(Rule::alerting("InstanceDown", "up == 0").with_for("5m"));
///
///     client.create_rule_group("alerts", &group).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RulerClient {
    client: ClientWithMiddleware,
    address: Url,
    id: String,
    key: String,
}

impl RulerClient {
    /// Create a new ruler client
    ///
    /// # Arguments
    ///
    /// * `config` - Ruler address and tenant credentials
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(config: Config, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RulerError::BuildHttpClient)?;

        let client = ClientBuilder::new(client).build();

        Self::with_client(client, config)
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (retry, logging, etc.)
    pub fn with_client(client: ClientWithMiddleware, config: Config) -> Result<Self> {
        let address = parse_address(&config.address)?;

        debug!(address = %address, id = %config.id, "New ruler client created");

        Ok(Self {
            client,
            address,
            id: config.id,
            key: config.key,
        })
    }

    /// Create a rule group in a namespace
    ///
    /// The group is sent as YAML. Re-creating an existing group name is
    /// handled however the ruler chooses.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The group cannot be encoded
    /// - The HTTP request fails
    /// - The ruler returns a non-success status code
    #[instrument(
        name = "RulerClient::create_rule_group",
        skip_all,
        fields(namespace = %namespace, group = %group.name)
    )]
    pub async fn create_rule_group(&self, namespace: &str, group: &RuleGroup) -> Result<()> {
        let payload = serde_yaml::to_string(group).map_err(RulerError::Encode)?;
        let url = self.rules_url(&[namespace])?;

        self.do_request(Method::POST, url, Some(payload)).await?;

        debug!("Rule group created");
        Ok(())
    }

    /// Delete a single rule group
    ///
    /// Returns [`RulerError::NotFound`] if the group does not exist, which
    /// callers may treat as success.
    #[instrument(
        name = "RulerClient::delete_rule_group",
        skip_all,
        fields(namespace = %namespace, group = %group_name)
    )]
    pub async fn delete_rule_group(&self, namespace: &str, group_name: &str) -> Result<()> {
        let url = self.rules_url(&[namespace, group_name])?;

        self.do_request(Method::DELETE, url, None).await?;

        debug!("Rule group deleted");
        Ok(())
    }

    /// Delete a namespace together with all of its rule groups
    #[instrument(
        name = "RulerClient::delete_namespace",
        skip_all,
        fields(namespace = %namespace)
    )]
    pub async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let url = self.rules_url(&[namespace])?;

        self.do_request(Method::DELETE, url, None).await?;

        debug!("Namespace deleted");
        Ok(())
    }

    /// Fetch a single rule group
    ///
    /// # Errors
    ///
    /// Returns [`RulerError::NotFound`] if the ruler has no such group, or
    /// [`RulerError::Decode`] if the response is not a valid rule group.
    #[instrument(
        name = "RulerClient::get_rule_group",
        skip_all,
        fields(namespace = %namespace, group = %group_name)
    )]
    pub async fn get_rule_group(&self, namespace: &str, group_name: &str) -> Result<RuleGroup> {
        let url = self.rules_url(&[namespace, group_name])?;

        let response = self.do_request(Method::GET, url, None).await?;
        let body = response.bytes().await.map_err(RulerError::ReadBody)?;

        serde_yaml::from_slice(&body).map_err(|err| {
            debug!(
                body = %String::from_utf8_lossy(&body),
                "Failed to unmarshal rule group from response"
            );
            RulerError::Decode(err)
        })
    }

    /// List rule groups by namespace
    ///
    /// An empty `namespace` lists every namespace of the tenant; otherwise
    /// only the given namespace is returned.
    #[instrument(
        name = "RulerClient::list_rules",
        skip_all,
        fields(namespace = %namespace)
    )]
    pub async fn list_rules(&self, namespace: &str) -> Result<RuleSet> {
        let url = if namespace.is_empty() {
            self.rules_url(&[])?
        } else {
            self.rules_url(&[namespace])?
        };

        let response = self.do_request(Method::GET, url, None).await?;
        let body = response.bytes().await.map_err(RulerError::ReadBody)?;

        let rule_set: RuleSet = serde_yaml::from_slice(&body).map_err(RulerError::Decode)?;

        debug!(namespaces = rule_set.len(), "Rules listed");
        Ok(rule_set)
    }

    /// Get the base API URL
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Get the tenant id sent with every request
    pub fn tenant_id(&self) -> &str {
        &self.id
    }

    /// Build `{address}/api/prom/rules/{segments...}`, keeping any base path
    fn rules_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.address.clone();
        url.path_segments_mut()
            .map_err(|_| RulerError::UnsupportedAddress(self.address.to_string()))?
            .pop_if_empty()
            .extend(RULES_PATH)
            .extend(segments);
        Ok(url)
    }

    /// Send one request and classify the response
    ///
    /// On success the caller owns the response; on failure the body has
    /// already been consumed into the error.
    async fn do_request(
        &self,
        method: Method,
        url: Url,
        payload: Option<String>,
    ) -> Result<Response> {
        debug!(method = %method, url = %url, "Sending request to ruler API");

        let mut request = self
            .client
            .request(method, url)
            .header(ORG_ID_HEADER, self.id.as_str());

        if !self.key.is_empty() {
            request = request.basic_auth(&self.id, Some(&self.key));
        }

        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, "application/yaml")
                .body(payload);
        }

        let response = request.send().await.map_err(RulerError::Request)?;

        check_response(response).await
    }
}

fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address).map_err(RulerError::InvalidAddress)?;
    if url.cannot_be_a_base() {
        return Err(RulerError::UnsupportedAddress(address.to_string()));
    }
    Ok(url)
}

async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();

    debug!(status = %status, "Checking response");

    if status.is_success() {
        return Ok(response);
    }

    let message = match response.text().await {
        Ok(body) => format!("request failed with response body {body}"),
        Err(err) => format!("unable to decode body, {err}"),
    };

    if status == StatusCode::NOT_FOUND {
        debug!(status = %status, msg = %message, "Resource not found");
        return Err(RulerError::NotFound);
    }

    debug!(status = %status, msg = %message, "Request failed");
    Err(RulerError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}
