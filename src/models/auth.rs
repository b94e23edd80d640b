// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,    // Dono de veículo
    Workshop, // Oficina
}

// Estrutura de dados ("claims") dentro do JWT emitido pelo backend gerenciado
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
    #[serde(default)]
    pub role: Option<UserRole>,
}

// O usuário já validado que os handlers recebem
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: UserRole,
}
