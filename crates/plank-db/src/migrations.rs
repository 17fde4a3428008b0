use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS boards (
            id           TEXT PRIMARY KEY,
            owner_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title        TEXT NOT NULL,
            description  TEXT,
            visibility   TEXT NOT NULL DEFAULT 'PUBLIC',
            cover_image  TEXT,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_boards_owner
            ON boards(owner_id);

        CREATE TABLE IF NOT EXISTS members (
            id          TEXT PRIMARY KEY,
            board_id    TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(board_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_members_board
            ON members(board_id);

        CREATE TABLE IF NOT EXISTS lists (
            id          TEXT PRIMARY KEY,
            board_id    TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
            title       TEXT NOT NULL,
            position    INTEGER NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_lists_board
            ON lists(board_id, position);

        CREATE TABLE IF NOT EXISTS cards (
            id           TEXT PRIMARY KEY,
            list_id      TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            title        TEXT NOT NULL,
            description  TEXT,
            position     INTEGER NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_cards_list
            ON cards(list_id, position);

        CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            card_id     TEXT NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_card
            ON comments(card_id, created_at);

        CREATE TABLE IF NOT EXISTS labels (
            id          TEXT PRIMARY KEY,
            board_id    TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
            color       TEXT NOT NULL,
            title       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_labels_board
            ON labels(board_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
