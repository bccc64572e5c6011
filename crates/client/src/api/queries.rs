//! GraphQL documents and response shapes for the remote source.
//!
//! Documents address the product/category/user schema directly; responses
//! deserialize into the shared domain types where the shapes line up.

use serde::Deserialize;

use shopsync_core::{AuthTokens, Category, Product, User};

pub const PRODUCT_FIELDS: &str = r"
  fragment ProductFields on Product {
    id
    title
    price
    description
    images
    category {
      id
      name
      image
    }
    creationAt
    updatedAt
  }
";

pub const GET_PRODUCTS: &str = r"
  query GetProducts {
    products {
      ...ProductFields
    }
  }
";

pub const DELETE_PRODUCT: &str = r"
  mutation DeleteProduct($id: ID!) {
    deleteProduct(id: $id)
  }
";

pub const GET_CATEGORIES: &str = r"
  query GetCategories {
    categories {
      id
      name
      image
      creationAt
      updatedAt
    }
  }
";

pub const LOGIN: &str = r"
  mutation Login($email: String!, $password: String!) {
    login(email: $email, password: $password) {
      access_token
      refresh_token
    }
  }
";

pub const REGISTER: &str = r"
  mutation AddUser($data: CreateUserDto!) {
    addUser(data: $data) {
      id
      email
      name
      role
      avatar
    }
  }
";

pub const REFRESH_TOKEN: &str = r"
  mutation RefreshToken($refreshToken: String!) {
    refreshToken(refreshToken: $refreshToken) {
      access_token
      refresh_token
    }
  }
";

pub const MY_PROFILE: &str = r"
  query MyProfile {
    myProfile {
      id
      email
      name
      role
      avatar
    }
  }
";

pub const UPDATE_USER: &str = r"
  mutation UpdateUser($id: ID!, $changes: UpdateUserDto!) {
    updateUser(id: $id, changes: $changes) {
      id
      email
      name
      role
      avatar
    }
  }
";

/// Join a fragment with the document that spreads it.
#[must_use]
pub fn with_product_fields(document: &str) -> String {
    format!("{PRODUCT_FIELDS}\n{document}")
}

// =============================================================================
// Response data shapes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProductData {
    #[serde(rename = "deleteProduct")]
    pub delete_product: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesData {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub login: AuthTokens,
}

#[derive(Debug, Deserialize)]
pub struct RegisterData {
    #[serde(rename = "addUser")]
    pub add_user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenData {
    #[serde(rename = "refreshToken")]
    pub refresh_token: AuthTokens,
}

#[derive(Debug, Deserialize)]
pub struct MyProfileData {
    #[serde(rename = "myProfile")]
    pub my_profile: User,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserData {
    #[serde(rename = "updateUser")]
    pub update_user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_response_parses_into_domain_types() {
        let json = r#"{
            "products": [{
                "id": "42",
                "title": "Lamp",
                "price": 10.5,
                "description": "desk lamp",
                "images": ["a.png"],
                "category": {"id": "1", "name": "electronics", "image": "icon.png"},
                "creationAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-02T00:00:00Z"
            }]
        }"#;
        let data: ProductsData = serde_json::from_str(json).expect("parse");
        assert_eq!(data.products.len(), 1);
        let product = &data.products[0];
        assert_eq!(product.title, "Lamp");
        assert!(!product.is_local_origin());
        assert_eq!(
            product.category.as_ref().map(|c| c.name.as_str()),
            Some("electronics")
        );
    }

    #[test]
    fn test_login_response_parses_token_pair() {
        let json = r#"{"login": {"access_token": "a", "refresh_token": "r"}}"#;
        let data: LoginData = serde_json::from_str(json).expect("parse");
        assert_eq!(data.login.access_token, "a");
        assert_eq!(data.login.refresh_token, "r");
    }

    #[test]
    fn test_with_product_fields_prepends_fragment() {
        let doc = with_product_fields(GET_PRODUCTS);
        assert!(doc.contains("fragment ProductFields"));
        assert!(doc.contains("query GetProducts"));
    }
}
