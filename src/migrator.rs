use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20240101_000001_create_purchase_orders_table::Migration,
        )]
    }
}

mod m20240101_000001_create_purchase_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Customer).text().not_null())
                        .col(ColumnDef::new(PurchaseOrders::LineItems).text().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Subtotal).double().not_null())
                        .col(ColumnDef::new(PurchaseOrders::TaxRate).double().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::TaxAmount)
                                .double()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Total).double().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Notes).text().null())
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::DueDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_order_number")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::OrderNumber)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PurchaseOrders {
        Table,
        Id,
        OrderNumber,
        Customer,
        LineItems,
        Subtotal,
        TaxRate,
        TaxAmount,
        Total,
        Notes,
        Status,
        CreatedAt,
        DueDate,
    }
}
