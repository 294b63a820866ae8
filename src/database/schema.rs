// SQL schema for the attestor database.
//
// No foreign keys: audit entries and tokens must outlive the documents
// they reference, and a deleted document must leave its trail intact.

pub const DOCUMENTS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    filename TEXT NOT NULL,
    commitment TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

pub const DOCUMENTS_OWNER_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_documents_owner
ON documents (owner_id, created_at)";

pub const VERIFICATION_TOKENS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS verification_tokens (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    secret TEXT NOT NULL UNIQUE,
    created_by TEXT NOT NULL,
    usage_limit INTEGER NOT NULL CHECK (usage_limit > 0),
    usage_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)";

pub const VERIFICATION_TOKENS_DOCUMENT_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_verification_tokens_document
ON verification_tokens (document_id)";

pub const AUDIT_LOG_TABLE: &str = "
CREATE TABLE IF NOT EXISTS audit_log (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    action TEXT NOT NULL CHECK (action IN (
        'view', 'verify', 'verify_public', 'update',
        'delete', 'create', 'generate_token', 'delete_token'
    )),
    user_id TEXT,
    success INTEGER NOT NULL DEFAULT 1,
    details TEXT NOT NULL DEFAULT '{}',
    timestamp TEXT NOT NULL
)";

pub const AUDIT_LOG_DOCUMENT_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_audit_log_document
ON audit_log (document_id, timestamp)";

pub const AUDIT_LOG_USER_INDEX: &str = "
CREATE INDEX IF NOT EXISTS idx_audit_log_user
ON audit_log (user_id, timestamp)";

/// Every statement, in creation order. Each runs as a single query.
pub const STATEMENTS: &[&str] = &[
    DOCUMENTS_TABLE,
    DOCUMENTS_OWNER_INDEX,
    VERIFICATION_TOKENS_TABLE,
    VERIFICATION_TOKENS_DOCUMENT_INDEX,
    AUDIT_LOG_TABLE,
    AUDIT_LOG_DOCUMENT_INDEX,
    AUDIT_LOG_USER_INDEX,
];
