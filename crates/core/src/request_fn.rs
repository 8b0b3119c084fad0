//! Rendering of the `api.ts` request function.

use std::fmt;
use std::str::FromStr;

use gogen_common::DEFAULT_REQUEST_MODULE;

use crate::naming::upper_first;

/// HTTP methods the request module exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Methods that may carry a JSON request body.
    pub fn allows_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unsupported HTTP method '{s}'"))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Everything needed to render one request function.
#[derive(Debug, Clone)]
pub struct RequestFunction {
    /// Exported function name, prefix already applied.
    pub name: String,
    /// Response type, after any prefix and conflict suffix.
    pub type_name: String,
    /// Request body type, when the function takes `data`.
    pub request_type_name: Option<String>,
    pub url: String,
    pub method: HttpMethod,
    pub request_module: String,
}

impl RequestFunction {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            request_type_name: None,
            url: url.into(),
            method: HttpMethod::Get,
            request_module: DEFAULT_REQUEST_MODULE.to_string(),
        }
    }

    /// Render the complete `api.ts` content for this function.
    pub fn render(&self) -> String {
        let type_name = upper_first(&self.type_name);
        let method = self.method.as_str().to_ascii_lowercase();

        let mut imports = vec![type_name.clone()];
        let (params, call) = match &self.request_type_name {
            Some(request_type) => {
                imports.push(request_type.clone());
                (
                    format!("data: {request_type}"),
                    format!("request.{method}<{type_name}>(\"{}\", data)", self.url),
                )
            }
            None => (
                String::new(),
                format!("request.{method}<{type_name}>(\"{}\")", self.url),
            ),
        };

        format!(
            "import request from \"{module}\";\nimport type {{ {imports} }} from \"./types\";\n\nexport function {name}({params}) {{\n  return {call};\n}}",
            module = self.request_module,
            imports = imports.join(", "),
            name = self.name,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn get_without_body() {
        let out = RequestFunction::new("getUsers", "UserResponse", "/api/users").render();
        assert_eq!(
            out,
            "import request from \"@/utils/request\";\n\
             import type { UserResponse } from \"./types\";\n\n\
             export function getUsers() {\n  return request.get<UserResponse>(\"/api/users\");\n}"
        );
        assert!(!out.contains("data:"));
    }

    #[test]
    fn post_with_body() {
        let mut func = RequestFunction::new("createUser", "UserResponse", "/api/users");
        func.method = HttpMethod::Post;
        func.request_type_name = Some("UserResponseRequest".to_string());
        let out = func.render();
        assert!(out.contains("import type { UserResponse, UserResponseRequest } from \"./types\";"));
        assert!(out.contains("export function createUser(data: UserResponseRequest)"));
        assert!(out.contains("request.post<UserResponse>(\"/api/users\", data)"));
    }

    #[test]
    fn method_is_lowercased_in_call() {
        for (method, call) in [
            (HttpMethod::Put, "request.put<T>"),
            (HttpMethod::Delete, "request.delete<T>"),
            (HttpMethod::Patch, "request.patch<T>"),
        ] {
            let mut func = RequestFunction::new("f", "T", "/x");
            func.method = method;
            assert!(func.render().contains(call));
        }
    }

    #[test]
    fn type_name_is_capitalized_and_module_configurable() {
        let mut func = RequestFunction::new("f", "userInfo", "/x");
        func.request_module = "~/http".to_string();
        let out = func.render();
        assert!(out.starts_with("import request from \"~/http\";"));
        assert!(out.contains("request.get<UserInfo>"));
    }

    #[test]
    fn parses_methods_case_insensitively() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert!("TRACE".parse::<HttpMethod>().is_err());
        assert!(HttpMethod::Patch.allows_body());
        assert!(!HttpMethod::Delete.allows_body());
    }
}
