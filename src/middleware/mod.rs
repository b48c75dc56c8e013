/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth (login / bearer / gate), cors, http
 */
pub mod auth;
pub mod cors;
pub mod http;
