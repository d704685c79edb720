//! URI - Decoding DataSync location URIs
//!
//! A location URI looks like `scheme://global-id[:port]/subdirectory`, where
//! the global ID is a server hostname, IP address or filesystem ID. S3 on
//! Outposts locations embed an access point ARN instead:
//! `s3://arn:aws:s3-outposts:region:account:outpost/op-id/accesspoint/ap-name/subdirectory`.

use std::sync::LazyLock;

use regex::Regex;

use crate::arn::Arn;

const LOCATION_URI_PATTERN: &str = r"^(azure-blob|efs|fsx[a-z0-9-]+|hdfs|nfs|s3|smb)://(.+)$";
const GLOBAL_ID_AND_SUBDIRECTORY_PATTERN: &str = r"^([a-zA-Z0-9.\-]+)(?::[0-9]{0,5})?(/.*)$";
const OUTPOSTS_ACCESS_POINT_RESOURCE_PATTERN: &str = r"^outpost/.*/accesspoint/.*?(/.*)$";

static LOCATION_URI_RE: LazyLock<Regex> = LazyLock::new(|| compile(LOCATION_URI_PATTERN));
static GLOBAL_ID_AND_SUBDIRECTORY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(GLOBAL_ID_AND_SUBDIRECTORY_PATTERN));
static OUTPOSTS_ACCESS_POINT_RESOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(OUTPOSTS_ACCESS_POINT_RESOURCE_PATTERN));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {:?}: {}", pattern, e),
    }
}

/// Location URI format error
///
/// Every variant names the string that failed and the pattern it was
/// matched against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationUriError {
    #[error("location URI ({uri}) does not match pattern {pattern:?}")]
    Scheme { uri: String, pattern: &'static str },

    #[error("location URI global ID and subdirectory ({rest}) does not match pattern {pattern:?}")]
    GlobalIdAndSubdirectory { rest: String, pattern: &'static str },

    #[error(
        "location URI S3 on Outposts access point ARN resource ({resource}) does not match pattern {pattern:?}"
    )]
    OutpostsAccessPointResource {
        resource: String,
        pattern: &'static str,
    },
}

/// Split a location URI into its scheme and the remainder after `://`
pub fn split_location_uri(uri: &str) -> Result<(&str, &str), LocationUriError> {
    let captures = LOCATION_URI_RE
        .captures(uri)
        .ok_or_else(|| LocationUriError::Scheme {
            uri: uri.to_string(),
            pattern: LOCATION_URI_PATTERN,
        })?;

    match (captures.get(1), captures.get(2)) {
        (Some(scheme), Some(rest)) => Ok((scheme.as_str(), rest.as_str())),
        _ => Err(LocationUriError::Scheme {
            uri: uri.to_string(),
            pattern: LOCATION_URI_PATTERN,
        }),
    }
}

/// Extract the global ID (hostname, IP address or filesystem ID) from a location URI
///
/// Any port is stripped. ARN-addressed URIs are not recognized here.
pub fn global_id_from_location_uri(uri: &str) -> Result<String, LocationUriError> {
    let (_, rest) = split_location_uri(uri)?;
    let (global_id, _) = split_global_id_and_subdirectory(rest)?;

    Ok(global_id.to_string())
}

/// Extract the subdirectory from a location URI
///
/// The result always starts with `/` and keeps any trailing slash.
pub fn subdirectory_from_location_uri(uri: &str) -> Result<String, LocationUriError> {
    let (scheme, rest) = split_location_uri(uri)?;

    match outposts_access_point_arn(rest) {
        Some(arn) => {
            log::debug!("location URI {} addresses access point {}", uri, arn);
            outposts_access_point_subdirectory(&arn).map(str::to_string)
        }
        None => {
            log::debug!("location URI {} uses {} global ID addressing", uri, scheme);
            let (_, subdirectory) = split_global_id_and_subdirectory(rest)?;
            Ok(subdirectory.to_string())
        }
    }
}

/// Interpret the part of a location URI after `://` as an ARN
///
/// Returns `None` for hostnames, IP addresses and filesystem IDs, which never
/// parse as ARNs. Attempted for every scheme, not just `s3`.
pub fn outposts_access_point_arn(rest: &str) -> Option<Arn> {
    rest.parse::<Arn>().ok()
}

/// Subdirectory following `accesspoint/<name>` in an Outposts access point ARN
pub fn outposts_access_point_subdirectory(arn: &Arn) -> Result<&str, LocationUriError> {
    OUTPOSTS_ACCESS_POINT_RESOURCE_RE
        .captures(&arn.resource)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| LocationUriError::OutpostsAccessPointResource {
            resource: arn.resource.clone(),
            pattern: OUTPOSTS_ACCESS_POINT_RESOURCE_PATTERN,
        })
}

fn split_global_id_and_subdirectory(rest: &str) -> Result<(&str, &str), LocationUriError> {
    let captures = GLOBAL_ID_AND_SUBDIRECTORY_RE.captures(rest);

    match captures.as_ref().map(|c| (c.get(1), c.get(2))) {
        Some((Some(global_id), Some(subdirectory))) => {
            Ok((global_id.as_str(), subdirectory.as_str()))
        }
        _ => Err(LocationUriError::GlobalIdAndSubdirectory {
            rest: rest.to_string(),
            pattern: GLOBAL_ID_AND_SUBDIRECTORY_PATTERN,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPOSTS_ARN: &str =
        "arn:aws:s3-outposts:eu-west-3:123456789012:outpost/op-01ac5d28a6a232904/accesspoint/my-ap";

    #[test]
    fn test_global_id_from_location_uri() {
        let cases: &[(&str, Option<&str>)] = &[
            ("", None),
            ("test://testing/", None),
            ("s3://", None),
            ("s3:///", None),
            ("s3://bucket", None),
            ("efs://us-west-2.fs-abcdef01/my-folder-1/", Some("us-west-2.fs-abcdef01")),
            ("nfs://example.com/my-folder-1/my-folder-2", Some("example.com")),
            ("smb://192.168.1.1/my-folder-1/", Some("192.168.1.1")),
            ("hdfs://192.168.1.1:80/my-folder-1/", Some("192.168.1.1")),
            ("s3://bucket/my-folder-1/", Some("bucket")),
            ("azure-blob://example.blob.core.windows.net/container/", Some("example.blob.core.windows.net")),
        ];

        for (uri, expected) in cases {
            let got = global_id_from_location_uri(uri);
            match expected {
                Some(id) => assert_eq!(got.as_deref(), Ok(*id), "uri: {:?}", uri),
                None => assert!(got.is_err(), "uri: {:?} gave {:?}", uri, got),
            }
        }
    }

    #[test]
    fn test_subdirectory_from_location_uri() {
        let outposts_root = format!("s3://{}/", OUTPOSTS_ARN);
        let outposts_folder = format!("s3://{}/my-folder-1/", OUTPOSTS_ARN);

        let cases: Vec<(&str, Option<&str>)> = vec![
            ("", None),
            ("test://testing/", None),
            ("s3://", None),
            ("s3:///", None),
            ("s3://bucket", None),
            ("s3://bucket/", Some("/")),
            ("s3://bucket/my-folder-1/", Some("/my-folder-1/")),
            ("s3://bucket/my-folder-1/my-folder-2", Some("/my-folder-1/my-folder-2")),
            (outposts_root.as_str(), Some("/")),
            (outposts_folder.as_str(), Some("/my-folder-1/")),
            ("efs://us-west-2.fs-abcdef01/my-folder-1/", Some("/my-folder-1/")),
            ("nfs://example.com/my-folder-1/my-folder-2", Some("/my-folder-1/my-folder-2")),
            ("smb://192.168.1.1/my-folder-1/", Some("/my-folder-1/")),
            ("hdfs://192.168.1.1:80/my-folder-1/", Some("/my-folder-1/")),
            ("fsxw://us-west-2.fs-abcdef012345678901/my-folder-1/", Some("/my-folder-1/")),
            (
                "fsxz://us-west-2.fs-abcdef012345678901/my-folder-1/my-folder-2",
                Some("/my-folder-1/my-folder-2"),
            ),
            ("fsxl://us-west-2.fs-abcdef012345678901/my-folder-1/", Some("/my-folder-1/")),
            ("fsxn-cifs://us-west-2.fs-abcdef012345678901/vol1/", Some("/vol1/")),
        ];

        for (uri, expected) in cases {
            let got = subdirectory_from_location_uri(uri);
            match expected {
                Some(dir) => assert_eq!(got.as_deref(), Ok(dir), "uri: {:?}", uri),
                None => assert!(got.is_err(), "uri: {:?} gave {:?}", uri, got),
            }
        }
    }

    #[test]
    fn test_global_id_and_subdirectory_reassemble() {
        let cases = [
            ("nfs://example.com/my-folder-1/my-folder-2", "example.com/my-folder-1/my-folder-2"),
            ("hdfs://192.168.1.1:80/my-folder-1/", "192.168.1.1:80/my-folder-1/"),
            ("efs://us-west-2.fs-abcdef01/", "us-west-2.fs-abcdef01/"),
        ];

        for (uri, rest) in cases {
            let global_id = global_id_from_location_uri(uri).unwrap();
            let subdirectory = subdirectory_from_location_uri(uri).unwrap();
            assert!(rest.starts_with(&global_id));
            assert!(rest.ends_with(&subdirectory));

            let port = &rest[global_id.len()..rest.len() - subdirectory.len()];
            assert!(port.is_empty() || port.starts_with(':'), "port: {:?}", port);
        }
    }

    #[test]
    fn test_port_is_not_range_checked() {
        assert_eq!(
            global_id_from_location_uri("hdfs://namenode:99999/data/").unwrap(),
            "namenode"
        );
        assert_eq!(
            subdirectory_from_location_uri("hdfs://namenode:/data/").unwrap(),
            "/data/"
        );
        assert!(subdirectory_from_location_uri("hdfs://namenode:123456/data/").is_err());
    }

    #[test]
    fn test_repeated_calls_agree() {
        let uri = "smb://192.168.1.1/my-folder-1/";
        assert_eq!(
            subdirectory_from_location_uri(uri),
            subdirectory_from_location_uri(uri)
        );
        assert_eq!(
            global_id_from_location_uri(uri),
            global_id_from_location_uri(uri)
        );
    }

    #[test]
    fn test_outposts_subdirectory_comes_from_arn_resource() {
        let uri = format!("s3://{}/my-folder-1/my-folder-2", OUTPOSTS_ARN);
        assert_eq!(
            subdirectory_from_location_uri(&uri).unwrap(),
            "/my-folder-1/my-folder-2"
        );
        // The plain split cannot handle the ARN's colons.
        assert!(global_id_from_location_uri(&uri).is_err());
    }

    #[test]
    fn test_outposts_arn_without_subdirectory() {
        let uri = format!("s3://{}", OUTPOSTS_ARN);
        let err = subdirectory_from_location_uri(&uri).unwrap_err();
        assert!(matches!(
            err,
            LocationUriError::OutpostsAccessPointResource { .. }
        ));
        assert!(err.to_string().contains("outpost/op-01ac5d28a6a232904/accesspoint/my-ap"));
        assert!(err.to_string().contains(OUTPOSTS_ACCESS_POINT_RESOURCE_PATTERN));
    }

    #[test]
    fn test_arn_branch_applies_to_every_scheme() {
        let uri = format!("nfs://{}/export/", OUTPOSTS_ARN);
        assert_eq!(subdirectory_from_location_uri(&uri).unwrap(), "/export/");

        let uri = "nfs://arn:aws:datasync:us-east-1:123456789012:location/loc-1/dir/";
        assert!(matches!(
            subdirectory_from_location_uri(uri),
            Err(LocationUriError::OutpostsAccessPointResource { .. })
        ));
    }

    #[test]
    fn test_outposts_access_point_arn() {
        assert!(outposts_access_point_arn("example.com/dir/").is_none());
        assert!(outposts_access_point_arn("192.168.1.1:80/dir/").is_none());

        let arn = outposts_access_point_arn(&format!("{}/dir/", OUTPOSTS_ARN)).unwrap();
        assert_eq!(arn.service, "s3-outposts");
        assert_eq!(outposts_access_point_subdirectory(&arn), Ok("/dir/"));
    }

    #[test]
    fn test_error_messages_name_input_and_pattern() {
        let err = subdirectory_from_location_uri("test://testing/").unwrap_err();
        assert_eq!(
            err,
            LocationUriError::Scheme {
                uri: "test://testing/".to_string(),
                pattern: LOCATION_URI_PATTERN,
            }
        );
        let message = err.to_string();
        assert!(message.starts_with("location URI (test://testing/) does not match pattern"));

        let err = global_id_from_location_uri("s3:///").unwrap_err();
        assert_eq!(
            err,
            LocationUriError::GlobalIdAndSubdirectory {
                rest: "/".to_string(),
                pattern: GLOBAL_ID_AND_SUBDIRECTORY_PATTERN,
            }
        );
        assert!(err.to_string().contains("(/)"));
    }

    #[test]
    fn test_split_location_uri() {
        assert_eq!(
            split_location_uri("fsxn-smb://svm-01.fs-1/vol/").unwrap(),
            ("fsxn-smb", "svm-01.fs-1/vol/")
        );
        assert!(split_location_uri("fsx://fs-1/").is_err());
        assert!(split_location_uri("S3://bucket/").is_err());
    }
}
