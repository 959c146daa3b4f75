// ==========================================
// SCIM 用户同步服务 - 记录映射器实现
// ==========================================
// 职责: 校验通过的 CSV 行 → 存储层用户创建结构
// ==========================================

use crate::domain::import::CsvUserRow;
use crate::domain::types::SCIM_USER_SCHEMA;
use crate::domain::user::{EmailAddress, ScimUserCreate};
use crate::importer::user_importer_trait::UserMapper;

pub struct ScimUserMapper;

impl UserMapper for ScimUserMapper {
    fn to_scim_create(&self, row: CsvUserRow) -> ScimUserCreate {
        // 邮箱列表: 主邮箱 + 可选次邮箱
        let mut emails = vec![EmailAddress::primary(row.email)];
        if let Some(secondary) = row.secondary_email {
            emails.push(EmailAddress::secondary(secondary));
        }

        ScimUserCreate {
            schemas: vec![SCIM_USER_SCHEMA.to_string()],
            user_name: row.user_name,
            external_id: row.external_id,
            first_name: row.first_name,
            sur_name: row.sur_name,
            display_name: row.display_name,
            active: row.active,
            emails,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_row() -> CsvUserRow {
        CsvUserRow {
            user_name: "jdoe".to_string(),
            first_name: "John".to_string(),
            sur_name: "Doe".to_string(),
            display_name: "John Doe".to_string(),
            email: "john@x.com".to_string(),
            secondary_email: None,
            external_id: Some("EMP001".to_string()),
            active: true,
        }
    }

    #[test]
    fn test_maps_primary_email() {
        let mapper = ScimUserMapper;
        let create = mapper.to_scim_create(csv_row());
        assert_eq!(create.emails.len(), 1);
        assert_eq!(create.emails[0].value, "john@x.com");
        assert!(create.emails[0].primary);
        assert_eq!(create.schemas, vec![SCIM_USER_SCHEMA.to_string()]);
    }

    #[test]
    fn test_maps_secondary_email() {
        let mapper = ScimUserMapper;
        let mut row = csv_row();
        row.secondary_email = Some("john.alt@x.com".to_string());
        let create = mapper.to_scim_create(row);
        assert_eq!(create.emails.len(), 2);
        assert!(!create.emails[1].primary);
    }

    #[test]
    fn test_carries_identity_fields() {
        let mapper = ScimUserMapper;
        let create = mapper.to_scim_create(csv_row());
        assert_eq!(create.user_name, "jdoe");
        assert_eq!(create.external_id.as_deref(), Some("EMP001"));
        assert!(create.active);
    }
}
