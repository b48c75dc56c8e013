/*
 * Responsibility
 * - リクエスト単位の「認証済みコンテキスト」の型
 * - validate stage が検証して request extensions に格納し、gate / handler はこの型だけを読む
 *
 * Notes
 * - extensions はリクエストと一緒に生まれて一緒に捨てられるので、並行リクエスト間で共有されない
 */
use crate::services::auth::AuthenticatedIdentity;

/// Identity bound to exactly one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub AuthenticatedIdentity);

impl RequestIdentity {
    pub fn identity(&self) -> &AuthenticatedIdentity {
        &self.0
    }
}
