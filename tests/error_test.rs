use std::io;

use template_patcher::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigParseError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::not_found("/tmp/missing");
    assert_eq!(err.to_string(), "Path '/tmp/missing' does not exist.");

    let err = Error::ExternalToolError { step: "Run tests".to_string(), code: 2 };
    assert_eq!(err.to_string(), "Step 'Run tests' failed with exit code 2.");
}
