pub mod keyset_service;
