//! Locus AWS Provider
//!
//! Reads DataSync locations and decodes their location URIs

use std::collections::HashMap;

use aws_config::Region;
use aws_sdk_datasync::Client as DataSyncClient;
use aws_sdk_datasync::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use locus_core::location::{LocationType, LocationUri};
use locus_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult, ResourceType};
use locus_core::resource::{ResourceId, State, Value};

/// DataSync location resource type
pub struct LocationResourceType(pub LocationType);

impl ResourceType for LocationResourceType {
    fn name(&self) -> &'static str {
        self.0.resource_type()
    }
}

/// Outcome of a DescribeLocation* call
#[derive(Debug, PartialEq)]
enum LocationLookup {
    /// The location exists; DataSync may omit the URI
    Found(Option<String>),
    NotFound,
}

/// DataSync Provider
pub struct DataSyncProvider {
    client: DataSyncClient,
}

impl DataSyncProvider {
    /// Create a new DataSync Provider
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: DataSyncClient::new(&config),
        }
    }

    /// Create with a specific client (for testing)
    pub fn with_client(client: DataSyncClient) -> Self {
        Self { client }
    }

    /// Read a DataSync location by ARN
    async fn read_location(
        &self,
        id: ResourceId,
        kind: LocationType,
        arn: &str,
    ) -> ProviderResult<State> {
        log::debug!("reading {} location {}", kind, arn);

        match self.describe_location_uri(kind, arn).await? {
            LocationLookup::NotFound => {
                log::warn!("DataSync location {} not found", arn);
                Ok(State::not_found(id))
            }
            LocationLookup::Found(None) => Err(ProviderError::new(format!(
                "DataSync location {} has no location URI",
                arn
            ))
            .for_resource(id)),
            LocationLookup::Found(Some(uri)) => location_state(id, kind, arn, &uri),
        }
    }

    async fn describe_location_uri(
        &self,
        kind: LocationType,
        arn: &str,
    ) -> ProviderResult<LocationLookup> {
        let client = &self.client;

        match kind {
            LocationType::AzureBlob => lookup(
                client
                    .describe_location_azure_blob()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::Efs => lookup(
                client
                    .describe_location_efs()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::FsxLustre => lookup(
                client
                    .describe_location_fsx_lustre()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::FsxOntap => lookup(
                client
                    .describe_location_fsx_ontap()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::FsxOpenZfs => lookup(
                client
                    .describe_location_fsx_open_zfs()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::FsxWindows => lookup(
                client
                    .describe_location_fsx_windows()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::Hdfs => lookup(
                client
                    .describe_location_hdfs()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::Nfs => lookup(
                client
                    .describe_location_nfs()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::S3 => lookup(
                client
                    .describe_location_s3()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
            LocationType::Smb => lookup(
                client
                    .describe_location_smb()
                    .location_arn(arn)
                    .send()
                    .await
                    .map(|out| out.location_uri),
            ),
        }
    }
}

/// Classify a DescribeLocation* result
///
/// DataSync reports a missing location as an InvalidRequestException whose
/// message contains "not found".
fn lookup<E, R>(result: Result<Option<String>, SdkError<E, R>>) -> ProviderResult<LocationLookup>
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match result {
        Ok(uri) => Ok(LocationLookup::Found(uri)),
        Err(err) => {
            let not_found = err.as_service_error().is_some_and(|e| {
                e.code() == Some("InvalidRequestException")
                    && e.message().is_some_and(|m| m.contains("not found"))
            });

            if not_found {
                Ok(LocationLookup::NotFound)
            } else {
                Err(ProviderError::new(format!(
                    "Failed to describe location: {}",
                    DisplayErrorContext(&err)
                ))
                .with_cause(err))
            }
        }
    }
}

/// Build the read state of a location from its DescribeLocation* URI
///
/// Sets `arn`, `location_uri` and `subdirectory`; server-addressed locations
/// (NFS, SMB, HDFS) also get `server_hostname`. Parse errors are returned
/// with the parser's message unchanged.
pub fn location_state(
    id: ResourceId,
    kind: LocationType,
    arn: &str,
    uri: &str,
) -> ProviderResult<State> {
    let parsed = LocationUri::parse(uri).map_err(|e| {
        ProviderError::new(e.to_string())
            .for_resource(id.clone())
            .with_cause(e)
    })?;

    if let Some(actual) = parsed.location_type()
        && actual != kind
    {
        log::warn!(
            "location {} reported {} URI for {} resource",
            arn,
            actual,
            kind
        );
    }

    let mut attributes = HashMap::new();
    attributes.insert("arn".to_string(), Value::from(arn));
    attributes.insert("location_uri".to_string(), Value::from(uri));
    attributes.insert(
        "subdirectory".to_string(),
        Value::String(parsed.subdirectory),
    );

    if kind.is_server_addressed()
        && let Some(hostname) = parsed.global_id
    {
        attributes.insert("server_hostname".to_string(), Value::String(hostname));
    }

    Ok(State::existing(id, attributes).with_identifier(arn))
}

impl Provider for DataSyncProvider {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        LocationType::ALL
            .into_iter()
            .map(|kind| Box::new(LocationResourceType(kind)) as Box<dyn ResourceType>)
            .collect()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let arn = identifier.unwrap_or(&id.name).to_string();
        Box::pin(async move {
            match LocationType::from_resource_type(&id.resource_type) {
                Some(kind) => self.read_location(id, kind, &arn).await,
                None => Err(ProviderError::new(format!(
                    "Unknown resource type: {}",
                    id.resource_type
                ))
                .for_resource(id.clone())),
            }
        })
    }
}
