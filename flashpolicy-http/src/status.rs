// HTTP status codes used by the policy server

/// The status codes this server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Ok = 200,
    NotFound = 404,
    MethodNotAllowed = 405,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn reason(&self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",
            HttpStatus::NotFound => "Not Found",
            HttpStatus::MethodNotAllowed => "Method Not Allowed",
            HttpStatus::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.code())
    }
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(HttpStatus::Ok.code(), 200);
        assert_eq!(HttpStatus::NotFound.code(), 404);
        assert_eq!(HttpStatus::MethodNotAllowed.code(), 405);
    }

    #[test]
    fn test_server_error() {
        assert!(HttpStatus::InternalServerError.is_server_error());
        assert!(!HttpStatus::NotFound.is_server_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpStatus::NotFound.to_string(), "404 Not Found");
    }
}
