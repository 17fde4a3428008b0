use crate::Database;
use crate::models::{
    BoardRow, CardRow, CommentRow, LabelRow, ListRow, MemberRow, UserRow, parse_id,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use uuid::Uuid;

use plank_core::position::{Slot, next_position, plan_reposition};
use plank_types::models::{LabelColor, Role};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn update_user(
        &self,
        id: &str,
        username: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET
                     username = COALESCE(?2, username),
                     password = COALESCE(?3, password)
                 WHERE id = ?1",
                params![id, username, password_hash],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_user(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])?))
    }

    // -- Boards --

    /// Create a board together with the owner's ADMIN membership and the
    /// default label set, in one transaction.
    pub fn create_board(
        &self,
        id: &str,
        owner_id: &str,
        title: &str,
        description: Option<&str>,
        visibility: &str,
        cover_image: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO boards (id, owner_id, title, description, visibility, cover_image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, owner_id, title, description, visibility, cover_image],
            )?;

            tx.execute(
                "INSERT INTO members (id, board_id, user_id, role) VALUES (?1, ?2, ?3, ?4)",
                params![
                    Uuid::new_v4().to_string(),
                    id,
                    owner_id,
                    Role::Admin.as_str()
                ],
            )?;

            for color in LabelColor::ALL {
                tx.execute(
                    "INSERT INTO labels (id, board_id, color) VALUES (?1, ?2, ?3)",
                    params![Uuid::new_v4().to_string(), id, color.as_str()],
                )?;
            }

            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_board(&self, id: &str) -> Result<Option<BoardRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, title, description, visibility, cover_image, created_at
                 FROM boards WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], board_from_row).optional()?;
            Ok(row)
        })
    }

    /// Public boards are listed for everyone; private boards only where the
    /// viewer holds a membership row.
    pub fn find_boards(
        &self,
        visibility: &str,
        viewer_id: &str,
        owner_id: Option<&str>,
        take: u32,
        skip: u32,
    ) -> Result<Vec<BoardRow>> {
        self.with_conn(|conn| {
            let rows = if visibility == "PRIVATE" {
                let mut stmt = conn.prepare(
                    "SELECT b.id, b.owner_id, b.title, b.description, b.visibility, b.cover_image, b.created_at
                     FROM boards b
                     JOIN members m ON m.board_id = b.id AND m.user_id = ?1
                     WHERE b.visibility = 'PRIVATE' AND (?2 IS NULL OR b.owner_id = ?2)
                     ORDER BY b.created_at DESC
                     LIMIT ?3 OFFSET ?4",
                )?;
                stmt.query_map(params![viewer_id, owner_id, take, skip], board_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            } else {
                let mut stmt = conn.prepare(
                    "SELECT id, owner_id, title, description, visibility, cover_image, created_at
                     FROM boards
                     WHERE visibility = 'PUBLIC' AND (?1 IS NULL OR owner_id = ?1)
                     ORDER BY created_at DESC
                     LIMIT ?2 OFFSET ?3",
                )?;
                stmt.query_map(params![owner_id, take, skip], board_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };
            Ok(rows)
        })
    }

    pub fn update_board(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
        visibility: Option<&str>,
        cover_image: Option<&str>,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE boards SET
                     title = COALESCE(?2, title),
                     description = COALESCE(?3, description),
                     visibility = COALESCE(?4, visibility),
                     cover_image = COALESCE(?5, cover_image)
                 WHERE id = ?1",
                params![id, title, description, visibility, cover_image],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_board(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM boards WHERE id = ?1", [id])?))
    }

    // -- Members --

    pub fn get_member(&self, board_id: &str, user_id: &str) -> Result<Option<MemberRow>> {
        self.with_conn(|conn| query_member(conn, board_id, user_id))
    }

    pub fn find_members(
        &self,
        board_id: &str,
        role: Option<&str>,
        take: u32,
        skip: u32,
    ) -> Result<Vec<MemberRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, user_id, role, created_at
                 FROM members
                 WHERE board_id = ?1 AND (?2 IS NULL OR role = ?2)
                 ORDER BY created_at
                 LIMIT ?3 OFFSET ?4",
            )?;
            let rows = stmt
                .query_map(params![board_id, role, take, skip], member_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn create_member(&self, id: &str, board_id: &str, user_id: &str, role: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO members (id, board_id, user_id, role) VALUES (?1, ?2, ?3, ?4)",
                params![id, board_id, user_id, role],
            )?;
            Ok(())
        })
    }

    pub fn update_member_role(&self, board_id: &str, user_id: &str, role: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE members SET role = ?3 WHERE board_id = ?1 AND user_id = ?2",
                params![board_id, user_id, role],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_member(&self, board_id: &str, user_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM members WHERE board_id = ?1 AND user_id = ?2",
                params![board_id, user_id],
            )?;
            Ok(changed)
        })
    }

    // -- Lists --

    /// Insert a list at the tail of its board. Position assignment and the
    /// insert share one transaction so concurrent appends can't collide.
    pub fn create_list(&self, id: &str, board_id: &str, title: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let position = next_position(&sibling_slots(
                &tx,
                "SELECT id, position FROM lists WHERE board_id = ?1 ORDER BY position",
                board_id,
            )?);
            tx.execute(
                "INSERT INTO lists (id, board_id, title, position) VALUES (?1, ?2, ?3, ?4)",
                params![id, board_id, title, position],
            )?;
            tx.commit()?;
            Ok(position)
        })
    }

    pub fn get_list(&self, id: &str) -> Result<Option<ListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, title, position, created_at FROM lists WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], list_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn find_board_lists(&self, board_id: &str) -> Result<Vec<ListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, title, position, created_at
                 FROM lists WHERE board_id = ?1 ORDER BY position",
            )?;
            let rows = stmt
                .query_map([board_id], list_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_list_title(&self, id: &str, title: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE lists SET title = ?2 WHERE id = ?1",
                params![id, title],
            )?;
            Ok(changed)
        })
    }

    /// Move a list within its board. Snapshot, plan and writes run in one
    /// transaction, which is the atomicity the planner requires of callers.
    /// Returns false when the list no longer exists.
    pub fn reposition_list(&self, id: &str, target: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let Some(board_id) = tx
                .query_row("SELECT board_id FROM lists WHERE id = ?1", [id], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?
            else {
                return Ok(false);
            };

            let slots = sibling_slots(
                &tx,
                "SELECT id, position FROM lists WHERE board_id = ?1 ORDER BY position",
                &board_id,
            )?;
            apply_reposition(&tx, "lists", &slots, id, target)?;

            tx.commit()?;
            Ok(true)
        })
    }

    pub fn delete_list(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM lists WHERE id = ?1", [id])?))
    }

    // -- Cards --

    pub fn create_card(
        &self,
        id: &str,
        list_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let position = next_position(&sibling_slots(
                &tx,
                "SELECT id, position FROM cards WHERE list_id = ?1 ORDER BY position",
                list_id,
            )?);
            tx.execute(
                "INSERT INTO cards (id, list_id, title, description, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, list_id, title, description, position],
            )?;
            tx.commit()?;
            Ok(position)
        })
    }

    pub fn get_card(&self, id: &str) -> Result<Option<CardRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, list_id, title, description, position, created_at
                 FROM cards WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], card_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn find_list_cards(&self, list_id: &str, take: u32, skip: u32) -> Result<Vec<CardRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, list_id, title, description, position, created_at
                 FROM cards WHERE list_id = ?1 ORDER BY position
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(params![list_id, take, skip], card_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_card(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE cards SET
                     title = COALESCE(?2, title),
                     description = COALESCE(?3, description)
                 WHERE id = ?1",
                params![id, title, description],
            )?;
            Ok(changed)
        })
    }

    pub fn reposition_card(&self, id: &str, target: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let Some(list_id) = tx
                .query_row("SELECT list_id FROM cards WHERE id = ?1", [id], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?
            else {
                return Ok(false);
            };

            let slots = sibling_slots(
                &tx,
                "SELECT id, position FROM cards WHERE list_id = ?1 ORDER BY position",
                &list_id,
            )?;
            apply_reposition(&tx, "cards", &slots, id, target)?;

            tx.commit()?;
            Ok(true)
        })
    }

    pub fn delete_card(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM cards WHERE id = ?1", [id])?))
    }

    // -- Comments --

    pub fn create_comment(&self, id: &str, card_id: &str, user_id: &str, content: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (id, card_id, user_id, content) VALUES (?1, ?2, ?3, ?4)",
                params![id, card_id, user_id, content],
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, card_id, user_id, content, created_at FROM comments WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], comment_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn find_card_comments(&self, card_id: &str, take: u32, skip: u32) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, card_id, user_id, content, created_at
                 FROM comments WHERE card_id = ?1
                 ORDER BY created_at DESC
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(params![card_id, take, skip], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_comment(&self, id: &str, content: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE comments SET content = ?2 WHERE id = ?1",
                params![id, content],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM comments WHERE id = ?1", [id])?))
    }

    // -- Labels --

    pub fn get_label(&self, id: &str) -> Result<Option<LabelRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, color, title, created_at FROM labels WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], label_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn find_board_labels(&self, board_id: &str) -> Result<Vec<LabelRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, board_id, color, title, created_at
                 FROM labels WHERE board_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt
                .query_map([board_id], label_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_label(&self, id: &str, title: Option<&str>, color: Option<&str>) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE labels SET
                     title = COALESCE(?2, title),
                     color = COALESCE(?3, color)
                 WHERE id = ?1",
                params![id, title, color],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_label(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM labels WHERE id = ?1", [id])?))
    }
}

// -- row mappers --

fn board_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoardRow> {
    Ok(BoardRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        visibility: row.get(4)?,
        cover_image: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn member_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemberRow> {
    Ok(MemberRow {
        id: row.get(0)?,
        board_id: row.get(1)?,
        user_id: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn list_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListRow> {
    Ok(ListRow {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        position: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn card_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CardRow> {
    Ok(CardRow {
        id: row.get(0)?,
        list_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        position: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn comment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        card_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn label_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LabelRow> {
    Ok(LabelRow {
        id: row.get(0)?,
        board_id: row.get(1)?,
        color: row.get(2)?,
        title: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is a fixed identifier supplied by this module, never input.
    let sql = format!(
        "SELECT id, username, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_member(conn: &Connection, board_id: &str, user_id: &str) -> Result<Option<MemberRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, board_id, user_id, role, created_at
         FROM members WHERE board_id = ?1 AND user_id = ?2",
    )?;
    let row = stmt
        .query_row([board_id, user_id], member_from_row)
        .optional()?;
    Ok(row)
}

/// One consistent snapshot of a sibling scope, as the planner's slots.
fn sibling_slots(conn: &Connection, sql: &str, parent_id: &str) -> Result<Vec<Slot>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([parent_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, position)| {
            Ok(Slot {
                id: parse_id(&id)?,
                position,
            })
        })
        .collect()
}

/// Plan the move from the snapshot and write every update in the open
/// transaction.
fn apply_reposition(
    conn: &Connection,
    table: &str,
    slots: &[Slot],
    moved_id: &str,
    target: i64,
) -> Result<()> {
    let moved = parse_id(moved_id)?;
    let current = slots
        .iter()
        .find(|s| s.id == moved)
        .map(|s| s.position)
        .ok_or_else(|| anyhow::anyhow!("{} row vanished mid-reposition: {}", table, moved_id))?;

    let sql = format!("UPDATE {} SET position = ?2 WHERE id = ?1", table);
    for update in plan_reposition(slots, moved, current, target) {
        conn.execute(&sql, params![update.id.to_string(), update.position])?;
    }
    Ok(())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn seed_user(db: &Database) -> String {
        let id = new_id();
        db.create_user(&id, &format!("user-{}", &id[..8]), "hash")
            .unwrap();
        id
    }

    fn seed_board(db: &Database, owner: &str) -> String {
        let id = new_id();
        db.create_board(&id, owner, "roadmap", None, "PUBLIC", None)
            .unwrap();
        id
    }

    #[test]
    fn board_creation_seeds_owner_membership_and_labels() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);

        let member = db.get_member(&board, &owner).unwrap().unwrap();
        assert_eq!(member.role, "ADMIN");

        let labels = db.find_board_labels(&board).unwrap();
        assert_eq!(labels.len(), LabelColor::ALL.len());
        assert!(labels.iter().all(|l| l.title.is_none()));
    }

    #[test]
    fn lists_append_densely_from_zero() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);

        assert_eq!(db.create_list(&new_id(), &board, "todo").unwrap(), 0);
        assert_eq!(db.create_list(&new_id(), &board, "doing").unwrap(), 1);
        assert_eq!(db.create_list(&new_id(), &board, "done").unwrap(), 2);

        let positions: Vec<i64> = db
            .find_board_lists(&board)
            .unwrap()
            .iter()
            .map(|l| l.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn list_reposition_through_sqlite_keeps_density() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);

        let a = new_id();
        let b = new_id();
        let c = new_id();
        db.create_list(&a, &board, "a").unwrap();
        db.create_list(&b, &board, "b").unwrap();
        db.create_list(&c, &board, "c").unwrap();

        // Head to tail: b and c each step back by one.
        assert!(db.reposition_list(&a, 2).unwrap());

        let lists = db.find_board_lists(&board).unwrap();
        let order: Vec<&str> = lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec![b.as_str(), c.as_str(), a.as_str()]);
        let positions: Vec<i64> = lists.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn reposition_of_missing_list_reports_not_found() {
        let db = db();
        assert!(!db.reposition_list(&new_id(), 0).unwrap());
    }

    #[test]
    fn card_positions_are_scoped_per_list() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);
        let list_a = new_id();
        let list_b = new_id();
        db.create_list(&list_a, &board, "a").unwrap();
        db.create_list(&list_b, &board, "b").unwrap();

        assert_eq!(db.create_card(&new_id(), &list_a, "one", None).unwrap(), 0);
        assert_eq!(db.create_card(&new_id(), &list_a, "two", None).unwrap(), 1);
        // A sibling list starts its own sequence.
        assert_eq!(db.create_card(&new_id(), &list_b, "three", None).unwrap(), 0);
    }

    #[test]
    fn deleting_a_card_leaves_a_gap_and_append_skips_it() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);
        let list = new_id();
        db.create_list(&list, &board, "l").unwrap();

        let first = new_id();
        db.create_card(&first, &list, "one", None).unwrap();
        db.create_card(&new_id(), &list, "two", None).unwrap();
        db.create_card(&new_id(), &list, "three", None).unwrap();

        db.delete_card(&first).unwrap();

        // No compaction: survivors keep 1 and 2, the next append takes 3.
        let positions: Vec<i64> = db
            .find_list_cards(&list, 50, 0)
            .unwrap()
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(db.create_card(&new_id(), &list, "four", None).unwrap(), 3);
    }

    #[test]
    fn board_delete_cascades_to_descendants() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);
        let list = new_id();
        let card = new_id();
        let comment = new_id();
        db.create_list(&list, &board, "l").unwrap();
        db.create_card(&card, &list, "c", None).unwrap();
        db.create_comment(&comment, &card, &owner, "hi").unwrap();

        db.delete_board(&board).unwrap();

        assert!(db.get_list(&list).unwrap().is_none());
        assert!(db.get_card(&card).unwrap().is_none());
        assert!(db.get_comment(&comment).unwrap().is_none());
        assert!(db.get_member(&board, &owner).unwrap().is_none());
        assert!(db.find_board_labels(&board).unwrap().is_empty());
    }

    #[test]
    fn duplicate_membership_is_rejected_by_the_unique_pair() {
        let db = db();
        let owner = seed_user(&db);
        let other = seed_user(&db);
        let board = seed_board(&db, &owner);

        db.create_member(&new_id(), &board, &other, "MEMBER").unwrap();
        assert!(db.create_member(&new_id(), &board, &other, "ADMIN").is_err());
    }

    #[test]
    fn private_boards_only_list_for_members() {
        let db = db();
        let owner = seed_user(&db);
        let outsider = seed_user(&db);
        let board = new_id();
        db.create_board(&board, &owner, "secret", None, "PRIVATE", None)
            .unwrap();

        let mine = db.find_boards("PRIVATE", &owner, None, 20, 0).unwrap();
        assert_eq!(mine.len(), 1);

        let theirs = db.find_boards("PRIVATE", &outsider, None, 20, 0).unwrap();
        assert!(theirs.is_empty());
    }

    #[test]
    fn partial_board_update_keeps_unset_fields() {
        let db = db();
        let owner = seed_user(&db);
        let board = seed_board(&db, &owner);

        db.update_board(&board, Some("renamed"), None, None, None)
            .unwrap();

        let row = db.get_board(&board).unwrap().unwrap();
        assert_eq!(row.title, "renamed");
        assert_eq!(row.visibility, "PUBLIC");
    }
}
