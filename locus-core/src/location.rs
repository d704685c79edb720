//! Location - DataSync location kinds and decoded location URIs

use std::fmt;

use crate::uri::{
    LocationUriError, global_id_from_location_uri, outposts_access_point_arn, split_location_uri,
    subdirectory_from_location_uri,
};

/// Kind of DataSync location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    AzureBlob,
    Efs,
    FsxLustre,
    FsxOntap,
    FsxOpenZfs,
    FsxWindows,
    Hdfs,
    Nfs,
    S3,
    Smb,
}

impl LocationType {
    pub const ALL: [LocationType; 10] = [
        LocationType::AzureBlob,
        LocationType::Efs,
        LocationType::FsxLustre,
        LocationType::FsxOntap,
        LocationType::FsxOpenZfs,
        LocationType::FsxWindows,
        LocationType::Hdfs,
        LocationType::Nfs,
        LocationType::S3,
        LocationType::Smb,
    ];

    /// Resource type name (e.g., "datasync.location_s3")
    pub fn resource_type(&self) -> &'static str {
        match self {
            LocationType::AzureBlob => "datasync.location_azure_blob",
            LocationType::Efs => "datasync.location_efs",
            LocationType::FsxLustre => "datasync.location_fsx_lustre_file_system",
            LocationType::FsxOntap => "datasync.location_fsx_ontap_file_system",
            LocationType::FsxOpenZfs => "datasync.location_fsx_openzfs_file_system",
            LocationType::FsxWindows => "datasync.location_fsx_windows_file_system",
            LocationType::Hdfs => "datasync.location_hdfs",
            LocationType::Nfs => "datasync.location_nfs",
            LocationType::S3 => "datasync.location_s3",
            LocationType::Smb => "datasync.location_smb",
        }
    }

    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.resource_type() == resource_type)
    }

    /// URI scheme DataSync reports for this kind
    pub fn scheme(&self) -> &'static str {
        match self {
            LocationType::AzureBlob => "azure-blob",
            LocationType::Efs => "efs",
            LocationType::FsxLustre => "fsxl",
            LocationType::FsxOntap => "fsxn",
            LocationType::FsxOpenZfs => "fsxz",
            LocationType::FsxWindows => "fsxw",
            LocationType::Hdfs => "hdfs",
            LocationType::Nfs => "nfs",
            LocationType::S3 => "s3",
            LocationType::Smb => "smb",
        }
    }

    /// Kind for a URI scheme
    ///
    /// ONTAP URIs carry a protocol suffix (`fsxn-nfs`, `fsxn-smb`).
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        if scheme.starts_with("fsxn") {
            return Some(LocationType::FsxOntap);
        }
        Self::ALL.into_iter().find(|t| t.scheme() == scheme)
    }

    /// Whether the URI global ID is the server hostname
    pub fn is_server_addressed(&self) -> bool {
        matches!(
            self,
            LocationType::Hdfs | LocationType::Nfs | LocationType::Smb
        )
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource_type())
    }
}

/// Decoded location URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationUri {
    pub scheme: String,
    /// None for S3 on Outposts access point URIs
    pub global_id: Option<String>,
    pub subdirectory: String,
}

impl LocationUri {
    pub fn parse(uri: &str) -> Result<Self, LocationUriError> {
        let (scheme, rest) = split_location_uri(uri)?;
        let subdirectory = subdirectory_from_location_uri(uri)?;
        let global_id = match outposts_access_point_arn(rest) {
            Some(_) => None,
            None => Some(global_id_from_location_uri(uri)?),
        };

        Ok(Self {
            scheme: scheme.to_string(),
            global_id,
            subdirectory,
        })
    }

    pub fn location_type(&self) -> Option<LocationType> {
        LocationType::from_scheme(&self.scheme)
    }
}

/// Compare two subdirectories, ignoring one trailing slash on each side
pub fn subdirectories_equivalent(old: &str, new: &str) -> bool {
    trim_trailing_slash(old) == trim_trailing_slash(new)
}

fn trim_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}
