/*
 * Responsibility
 * - transport-level layers shared by the whole Router
 */
pub mod cors;
pub mod http;
